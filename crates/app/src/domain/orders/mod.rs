//! Orders

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod status;

pub use errors::{OrdersServiceError, TransitionRejection, ValidationError};
pub use service::*;
pub use status::{OrderAction, OrderStatus};
