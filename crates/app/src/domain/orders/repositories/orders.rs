//! Orders Repository

use jiff::Timestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::{
    database::{timestamp_column, try_get_decimal, try_get_timestamp},
    domain::{
        orders::{
            data::NewOrder,
            records::{OrderRecord, OrderUuid},
            status::OrderStatus,
        },
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const SET_ORDER_TOTAL_SQL: &str = include_str!("../sql/set_order_total.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteOrdersRepository;

impl SqliteOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order awaiting payment with a zero total.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: &NewOrder,
        now: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Sqlite, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(order.shipping.full_name.as_str())
            .bind(order.shipping.address.as_str())
            .bind(order.shipping.phone.as_str())
            .bind(timestamp_column(now))
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order header. Items are loaded separately.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Sqlite, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// A user's orders, newest first, optionally restricted to one status.
    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserUuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Sqlite, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_order_total(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
        total: Decimal,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ORDER_TOTAL_SQL)
            .bind(order.into_uuid())
            .bind(total.to_string())
            .bind(timestamp_column(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Move an order from `from` to `to`, keeping the paid flag in step with the status.
    ///
    /// Nothing changes when the stored status is no longer `from`.
    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(to.is_paid())
            .bind(timestamp_column(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Delete an order still in `status`. Its items go with it.
    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, SqliteRow> for OrderRecord {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            full_name: row.try_get("full_name")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            status,
            paid: row.try_get("paid")?,
            total_price: try_get_decimal(row, "total_price")?,
            items: Vec::new(),
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
