use bakery_app::{
    config::DatabaseConfig,
    domain::products::{ProductsService, SqliteProductsService},
};
use clap::Args;

use crate::cli::{open, print_json};

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let service = SqliteProductsService::new(open(&args.database).await?);

    let products = service
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    print_json(&products)
}
