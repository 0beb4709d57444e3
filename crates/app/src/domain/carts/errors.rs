//! Carts service errors.

use thiserror::Error;

use crate::domain::products::{ProductsServiceError, records::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The catalog does not know the product (or it has been deleted).
    #[error("product {0} not found")]
    NotFound(ProductUuid),

    /// Quantities start at one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The cart's total would no longer fit the decimal range.
    #[error("cart total is out of range")]
    TotalOverflow,

    #[error("catalog lookup failed")]
    Catalog(#[source] ProductsServiceError),
}
