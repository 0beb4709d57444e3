use bakery_app::{
    config::DatabaseConfig,
    domain::products::{
        ProductsService, SqliteProductsService, data::NewProduct, records::ProductUuid,
    },
};
use clap::Args;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cli::{open, print_json};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 2.50
    #[arg(long)]
    price: Decimal,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let service = SqliteProductsService::new(open(&args.database).await?);

    let product = service
        .create_product(NewProduct {
            uuid: args
                .product_uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    print_json(&product)
}
