//! Orders Data

use std::fmt;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::domain::{
    carts::models::CartEntry,
    orders::{
        errors::ValidationError,
        records::{OrderItemUuid, OrderUuid},
    },
    products::records::ProductUuid,
    users::UserUuid,
};

/// Delivery details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub full_name: String,
    pub address: String,
    pub phone: String,
}

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    FullName,
    Address,
    Phone,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full_name",
            Self::Address => "address",
            Self::Phone => "phone",
        })
    }
}

impl ShippingInfo {
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Trim every field and report all of those left empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] naming each blank field.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let shipping = Self {
            full_name: self.full_name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };

        let missing: SmallVec<[ShippingField; 3]> = [
            (ShippingField::FullName, &shipping.full_name),
            (ShippingField::Address, &shipping.address),
            (ShippingField::Phone, &shipping.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(shipping)
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub shipping: ShippingInfo,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl From<&CartEntry> for NewOrderItem {
    fn from(entry: &CartEntry) -> Self {
        Self {
            uuid: OrderItemUuid::new(),
            product_uuid: entry.product_uuid,
            name: entry.name.clone(),
            unit_price: entry.unit_price,
            quantity: entry.quantity,
        }
    }
}
