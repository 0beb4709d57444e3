use clap::{Args, Subcommand};

mod create;
mod delete;
mod list;
mod update;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product to the catalog
    Create(create::CreateProductArgs),
    /// List live products
    List(list::ListProductsArgs),
    /// Change a product's name and price
    Update(update::UpdateProductArgs),
    /// Remove a product from the catalog
    Delete(delete::DeleteProductArgs),
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(args).await,
        ProductSubcommand::List(args) => list::run(args).await,
        ProductSubcommand::Update(args) => update::run(args).await,
        ProductSubcommand::Delete(args) => delete::run(args).await,
    }
}
