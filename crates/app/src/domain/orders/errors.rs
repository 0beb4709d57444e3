//! Orders service errors.

use std::fmt;

use smallvec::SmallVec;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    orders::{
        data::ShippingField,
        records::{OrderRecord, OrderUuid},
        status::{OrderAction, OrderStatus},
    },
    payments::PaymentError,
    products::records::ProductUuid,
};

/// Checkout input that cannot become an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing shipping fields: {}", join_fields(.0))]
    MissingFields(SmallVec<[ShippingField; 3]>),
}

fn join_fields(fields: &[ShippingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why an order refused an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// The requesting user does not own the order.
    NotOwner,
    /// The action is not legal from the order's current status.
    Status(OrderStatus),
}

impl fmt::Display for TransitionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwner => f.write_str("order belongs to another user"),
            Self::Status(status) => write!(f, "order is {status}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("product {0} is no longer available")]
    ProductUnavailable(ProductUuid),

    #[error("order total is out of range")]
    TotalOverflow,

    #[error("cannot {action} order {order}: {reason}")]
    InvalidTransition {
        order: OrderUuid,
        action: OrderAction,
        reason: TransitionRejection,
    },

    /// The order is returned untouched so the payment form can be shown again.
    #[error("payment for order {} rejected", .order.uuid)]
    PaymentRejected {
        order: Box<OrderRecord>,
        #[source]
        reason: PaymentError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
