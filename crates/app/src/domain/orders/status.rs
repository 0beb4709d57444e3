//! Order status and transitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created by checkout, waiting for the customer to pay.
    PendingPayment,
    InProgress,
    Paid,
    /// Never assigned: cancelling deletes the order instead.
    Cancelled,
    /// Never assigned: a refund request only acknowledges a paid order.
    RefundRequested,
}

/// Requests that move an order through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Pay,
    Cancel,
    RequestRefund,
}

/// Where an accepted action leaves the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The stored status changes to the given one.
    MoveTo(OrderStatus),
    /// The order row is removed.
    Delete,
    /// The request is acknowledged and the order is left as it is.
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0:?}")]
pub struct UnknownStatus(String);

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::PendingPayment,
        Self::InProgress,
        Self::Paid,
        Self::Cancelled,
        Self::RefundRequested,
    ];

    /// Canonical storage spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::InProgress => "in_progress",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::RefundRequested => "refund_requested",
        }
    }

    /// An order that can still be paid or cancelled.
    pub const fn awaits_payment(self) -> bool {
        matches!(self, Self::PendingPayment | Self::InProgress)
    }

    /// The `paid` flag that must accompany this status.
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Decide what `action` does to an order in this status, or `None` when it is illegal.
    pub const fn apply(self, action: OrderAction) -> Option<Transition> {
        match action {
            OrderAction::Pay if self.awaits_payment() => Some(Transition::MoveTo(Self::Paid)),
            OrderAction::Cancel if self.awaits_payment() => Some(Transition::Delete),
            OrderAction::RequestRefund if self.is_paid() => Some(Transition::Acknowledge),
            OrderAction::Pay | OrderAction::Cancel | OrderAction::RequestRefund => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl OrderAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pay => "pay",
            Self::Cancel => "cancel",
            Self::RequestRefund => "request_refund",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
