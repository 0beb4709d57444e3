use bakery_app::{
    config::DatabaseConfig,
    domain::products::{
        ProductsService, SqliteProductsService, data::ProductUpdate, records::ProductUuid,
    },
};
use clap::Args;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cli::{open, print_json};

#[derive(Debug, Args)]
pub(crate) struct UpdateProductArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Product to change
    #[arg(long)]
    product_uuid: Uuid,

    /// New product name
    #[arg(long)]
    name: String,

    /// New unit price
    #[arg(long)]
    price: Decimal,
}

pub(crate) async fn run(args: UpdateProductArgs) -> Result<(), String> {
    let service = SqliteProductsService::new(open(&args.database).await?);

    let product = service
        .update_product(
            ProductUuid::from_uuid(args.product_uuid),
            ProductUpdate {
                name: args.name,
                price: args.price,
            },
        )
        .await
        .map_err(|error| format!("failed to update product: {error}"))?;

    print_json(&product)
}
