//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{Cart, CartEntry},
    },
    products::{ProductsService, ProductsServiceError, records::ProductUuid},
};

/// Cart store backed by the session's own cart and the catalog.
#[derive(Clone)]
pub struct CatalogCartsService {
    products: Arc<dyn ProductsService>,
}

impl CatalogCartsService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>) -> Self {
        Self { products }
    }
}

impl fmt::Debug for CatalogCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCartsService").finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for CatalogCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, cart),
        fields(product_uuid = %product),
        err
    )]
    async fn add_item(
        &self,
        cart: &mut Cart,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartEntry, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity(quantity));
        }

        let record = match self.products.get_product(product).await {
            Ok(record) => record,
            Err(ProductsServiceError::NotFound) => {
                return Err(CartsServiceError::NotFound(product));
            }
            Err(error) => return Err(CartsServiceError::Catalog(error)),
        };

        let previous = cart.get(product).cloned();
        let entry = cart.add(product, &record.name, record.price, quantity).clone();

        if cart.view().total().is_none() {
            cart.remove(product);

            if let Some(previous) = previous {
                cart.add(
                    product,
                    &previous.name,
                    previous.unit_price,
                    previous.quantity,
                );
            }

            warn!(quantity, "cart total out of range");

            return Err(CartsServiceError::TotalOverflow);
        }

        debug!(quantity = entry.quantity, "cart entry updated");

        Ok(entry)
    }
}

#[automock]
#[async_trait]
/// Cart mutations that need the catalog.
///
/// Removing and clearing never consult the catalog and are plain [`Cart`] methods.
pub trait CartsService: Send + Sync {
    /// Add `quantity` units of a product, snapshotting its name and price on first add.
    ///
    /// The cart is left unchanged when the addition would push its total out of range.
    async fn add_item(
        &self,
        cart: &mut Cart,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartEntry, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::domain::products::{MockProductsService, records::ProductRecord};

    use super::*;

    fn product_record(uuid: ProductUuid, name: &str, price: Decimal) -> ProductRecord {
        let now = Timestamp::now();

        ProductRecord {
            uuid,
            name: name.to_string(),
            price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn add_item_snapshots_catalog_details() -> TestResult {
        let uuid = ProductUuid::new();
        let record = product_record(uuid, "Croissant", Decimal::new(250, 2));

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |product| *product == uuid)
            .return_once(move |_| Ok(record));

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        let entry = service.add_item(&mut cart, uuid, 3).await?;

        assert_eq!(entry.name, "Croissant");
        assert_eq!(entry.unit_price, Decimal::new(250, 2));
        assert_eq!(entry.quantity, 3);
        assert_eq!(cart.get(uuid), Some(&entry));

        Ok(())
    }

    #[tokio::test]
    async fn repeated_add_keeps_first_price_after_catalog_change() -> TestResult {
        let uuid = ProductUuid::new();
        let first = product_record(uuid, "Croissant", Decimal::new(250, 2));
        let repriced = product_record(uuid, "Croissant", Decimal::new(275, 2));

        let mut products = MockProductsService::new();
        let mut lookups = vec![repriced, first];

        products
            .expect_get_product()
            .times(2)
            .returning(move |_| lookups.pop().ok_or(ProductsServiceError::NotFound));

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        service.add_item(&mut cart, uuid, 1).await?;
        let entry = service.add_item(&mut cart, uuid, 2).await?;

        assert_eq!(entry.quantity, 3);
        assert_eq!(entry.unit_price, Decimal::new(250, 2));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_not_found() {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        let result = service.add_item(&mut cart, uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound(product)) if product == uuid),
            "expected NotFound, got {result:?}"
        );
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn add_item_zero_quantity_skips_catalog() {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        let result = service.add_item(&mut cart, ProductUuid::new(), 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn catalog_storage_errors_are_wrapped() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        let result = service.add_item(&mut cart, ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::Catalog(_))),
            "expected Catalog, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_beyond_total_range_leaves_cart_unchanged() -> TestResult {
        let cake = ProductUuid::new();
        let bun = ProductUuid::new();
        let cake_record = product_record(cake, "Wedding cake", Decimal::MAX);
        let bun_record = product_record(bun, "Bun", Decimal::ONE);

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .withf(move |product| *product == cake)
            .returning(move |_| Ok(cake_record.clone()));
        products
            .expect_get_product()
            .withf(move |product| *product == bun)
            .returning(move |_| Ok(bun_record.clone()));

        let service = CatalogCartsService::new(Arc::new(products));
        let mut cart = Cart::new();

        service.add_item(&mut cart, cake, 1).await?;
        let before = cart.clone();

        let doubled = service.add_item(&mut cart, cake, 1).await;
        let extra = service.add_item(&mut cart, bun, 1).await;

        assert!(
            matches!(doubled, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {doubled:?}"
        );
        assert!(
            matches!(extra, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {extra:?}"
        );
        assert_eq!(cart, before);
        assert_eq!(cart.view().total(), Some(Decimal::MAX));

        Ok(())
    }
}
