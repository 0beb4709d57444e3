use bakery_app::{
    config::DatabaseConfig,
    domain::{
        orders::{OrderStatus, OrdersService, SqliteOrdersService},
        users::UserUuid,
    },
};
use clap::Args;
use uuid::Uuid;

use crate::cli::{open, print_json};

#[derive(Debug, Args)]
pub(crate) struct OrderHistoryArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Owner of the orders
    #[arg(long)]
    user_uuid: Uuid,

    /// Only show orders in this status (e.g. pending_payment, paid)
    #[arg(long)]
    status: Option<OrderStatus>,
}

pub(crate) async fn run(args: OrderHistoryArgs) -> Result<(), String> {
    let service = SqliteOrdersService::new(open(&args.database).await?);

    let orders = service
        .order_history(UserUuid::from_uuid(args.user_uuid), args.status)
        .await
        .map_err(|error| format!("failed to load order history: {error}"))?;

    print_json(&orders)
}
