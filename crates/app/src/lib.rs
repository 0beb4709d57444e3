//! Bakery storefront core: catalog, session carts, orders and payment checks.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod storefront;

#[cfg(test)]
mod test;

mod uuids;
