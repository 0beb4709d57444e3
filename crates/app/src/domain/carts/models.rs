//! Cart Models

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::products::records::ProductUuid;

/// One product line in a cart, carrying the name and price seen when it was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price multiplied by quantity, or `None` when it exceeds the decimal range.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Session-scoped cart keyed by product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    entries: FxHashMap<ProductUuid, CartEntry>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `quantity` units of a product into the cart.
    ///
    /// An existing entry keeps its original name and price snapshot and only grows in
    /// quantity; the accumulated quantity saturates at `u32::MAX`.
    pub fn add(
        &mut self,
        product_uuid: ProductUuid,
        name: &str,
        unit_price: Decimal,
        quantity: u32,
    ) -> &CartEntry {
        self.entries
            .entry(product_uuid)
            .and_modify(|entry| entry.quantity = entry.quantity.saturating_add(quantity))
            .or_insert_with(|| CartEntry {
                product_uuid,
                name: name.to_string(),
                unit_price,
                quantity,
            })
    }

    /// Drop a product from the cart. Returns the removed entry, if there was one.
    pub fn remove(&mut self, product_uuid: ProductUuid) -> Option<CartEntry> {
        self.entries.remove(&product_uuid)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, product_uuid: ProductUuid) -> Option<&CartEntry> {
        self.entries.get(&product_uuid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read-only view over the cart's lines and total.
    pub fn view(&self) -> CartView<'_> {
        CartView { cart: self }
    }
}

/// Borrowed view of a cart for display.
#[derive(Debug, Clone, Copy)]
pub struct CartView<'a> {
    cart: &'a Cart,
}

impl<'a> CartView<'a> {
    /// Iterate the cart's entries. Each call starts a fresh pass.
    pub fn entries(&self) -> impl Iterator<Item = &'a CartEntry> + 'a {
        let cart: &'a Cart = self.cart;

        cart.entries.values()
    }

    /// Sum of every entry's subtotal, or `None` when it exceeds the decimal range.
    pub fn total(&self) -> Option<Decimal> {
        self.entries()
            .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.subtotal()?))
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}
