//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{orders::status::OrderStatus, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub status: OrderStatus,
    pub paid: bool,
    pub total_price: Decimal,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub created_at: Timestamp,
}

impl OrderItemRecord {
    /// `None` when unit price times quantity leaves the decimal range.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Receipt for a refund request on a paid order. The order itself is not modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundAcknowledgement {
    pub order_uuid: OrderUuid,
    pub total_price: Decimal,
    pub requested_at: Timestamp,
}
