use bakery_app::{
    config::DatabaseConfig,
    domain::products::{ProductsService, SqliteProductsService, records::ProductUuid},
};
use clap::Args;
use uuid::Uuid;

use crate::cli::open;

#[derive(Debug, Args)]
pub(crate) struct DeleteProductArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Product to remove
    #[arg(long)]
    product_uuid: Uuid,
}

pub(crate) async fn run(args: DeleteProductArgs) -> Result<(), String> {
    let service = SqliteProductsService::new(open(&args.database).await?);

    service
        .delete_product(ProductUuid::from_uuid(args.product_uuid))
        .await
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {}", args.product_uuid);

    Ok(())
}
