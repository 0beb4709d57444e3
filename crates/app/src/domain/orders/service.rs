//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::models::Cart,
        orders::{
            data::{NewOrder, NewOrderItem, ShippingInfo},
            errors::{OrdersServiceError, TransitionRejection, ValidationError},
            records::{OrderRecord, OrderUuid, RefundAcknowledgement},
            repositories::{SqliteOrderItemsRepository, SqliteOrdersRepository},
            status::{OrderAction, OrderStatus, Transition},
        },
        payments::PaymentDetails,
        products::repository::SqliteProductsRepository,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct SqliteOrdersService {
    db: Db,
    orders: SqliteOrdersRepository,
    items: SqliteOrderItemsRepository,
    products: SqliteProductsRepository,
}

impl SqliteOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: SqliteOrdersRepository::new(),
            items: SqliteOrderItemsRepository::new(),
            products: SqliteProductsRepository::new(),
        }
    }

    async fn load_items(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        mut order: OrderRecord,
    ) -> Result<OrderRecord, sqlx::Error> {
        order.items = self.items.list_order_items(tx, order.uuid).await?;

        Ok(order)
    }

    /// Load an order the user owns. Orders of other users are reported as missing.
    async fn owned_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let record = self.orders.get_order(tx, order).await?;

        if record.user_uuid != user {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(self.load_items(tx, record).await?)
    }
}

/// Check ownership and status before `action` touches `order`.
fn authorize(
    order: &OrderRecord,
    user: UserUuid,
    action: OrderAction,
) -> Result<Transition, OrdersServiceError> {
    let rejection = |reason| OrdersServiceError::InvalidTransition {
        order: order.uuid,
        action,
        reason,
    };

    if order.user_uuid != user {
        return Err(rejection(TransitionRejection::NotOwner));
    }

    order
        .status
        .apply(action)
        .ok_or_else(|| rejection(TransitionRejection::Status(order.status)))
}

#[async_trait]
impl OrdersService for SqliteOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, shipping, cart),
        fields(user_uuid = %user, order_uuid = tracing::field::Empty),
        err
    )]
    async fn checkout(
        &self,
        user: UserUuid,
        shipping: ShippingInfo,
        cart: &mut Cart,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        let new_order = NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: user,
            shipping: shipping.validated()?,
        };

        tracing::Span::current().record("order_uuid", tracing::field::display(new_order.uuid));

        let now = Timestamp::now();
        let mut tx = self.db.begin_transaction().await?;

        let mut order = self.orders.create_order(&mut tx, &new_order, now).await?;
        let mut total = Decimal::ZERO;

        for entry in cart.view().entries() {
            match self.products.get_product(&mut tx, entry.product_uuid).await {
                Ok(_) => {}
                Err(sqlx::Error::RowNotFound) => {
                    warn!(product_uuid = %entry.product_uuid, "cart product no longer available");

                    return Err(OrdersServiceError::ProductUnavailable(entry.product_uuid));
                }
                Err(error) => return Err(error.into()),
            }

            let item = self
                .items
                .create_order_item(&mut tx, order.uuid, &NewOrderItem::from(entry), now)
                .await?;

            total = item
                .subtotal()
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or(OrdersServiceError::TotalOverflow)?;
            order.items.push(item);
        }

        if self
            .orders
            .set_order_total(&mut tx, order.uuid, total, now)
            .await?
            == 0
        {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        order.total_price = total;
        cart.clear();

        info!(
            items = order.items.len(),
            total_price = %order.total_price,
            "order placed"
        );

        Ok(order)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.owned_order(&mut tx, user, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn continue_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let order = self.get_order(user, order).await?;

        if !order.status.awaits_payment() {
            return Err(OrdersServiceError::InvalidTransition {
                order: order.uuid,
                action: OrderAction::Pay,
                reason: TransitionRejection::Status(order.status),
            });
        }

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.pay",
        skip(self, payment),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn pay(
        &self,
        user: UserUuid,
        order: OrderUuid,
        payment: PaymentDetails,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        let Transition::MoveTo(target) = authorize(&record, user, OrderAction::Pay)? else {
            return Err(OrdersServiceError::InvalidTransition {
                order,
                action: OrderAction::Pay,
                reason: TransitionRejection::Status(record.status),
            });
        };

        if let Err(reason) = payment.validate() {
            warn!(%reason, "payment rejected");

            let record = self.load_items(&mut tx, record).await?;

            return Err(OrdersServiceError::PaymentRejected {
                order: Box::new(record),
                reason,
            });
        }

        let rows_affected = self
            .orders
            .update_order_status(&mut tx, order, record.status, target, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::InvalidTransition {
                order,
                action: OrderAction::Pay,
                reason: TransitionRejection::Status(record.status),
            });
        }

        let record = self.orders.get_order(&mut tx, order).await?;
        let record = self.load_items(&mut tx, record).await?;

        tx.commit().await?;

        info!(total_price = %record.total_price, "order paid");

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.cancel",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn cancel(&self, user: UserUuid, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        authorize(&record, user, OrderAction::Cancel)?;

        let rows_affected = self
            .orders
            .delete_order(&mut tx, order, record.status)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        info!("order cancelled");

        Ok(())
    }

    #[tracing::instrument(
        name = "orders.service.request_refund",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn request_refund(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<RefundAcknowledgement, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        authorize(&record, user, OrderAction::RequestRefund)?;

        tx.commit().await?;

        info!(total_price = %record.total_price, "refund requested");

        Ok(RefundAcknowledgement {
            order_uuid: record.uuid,
            total_price: record.total_price,
            requested_at: Timestamp::now(),
        })
    }

    async fn order_history(
        &self,
        user: UserUuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let headers = self.orders.list_user_orders(&mut tx, user, status).await?;
        let mut orders = Vec::with_capacity(headers.len());

        for order in headers {
            orders.push(self.load_items(&mut tx, order).await?);
        }

        tx.commit().await?;

        Ok(orders)
    }
}

#[automock]
#[async_trait]
/// Order placement and lifecycle.
///
/// Every operation acts on behalf of `user`; orders belonging to someone else are never
/// returned or modified.
pub trait OrdersService: Send + Sync {
    /// Turn the cart into an order awaiting payment.
    ///
    /// Runs in one transaction. On success the cart is cleared; on any failure no order
    /// or item is stored and the cart is left untouched.
    async fn checkout(
        &self,
        user: UserUuid,
        shipping: ShippingInfo,
        cart: &mut Cart,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Fetch one of the user's orders with its items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Re-open an unpaid order for payment.
    async fn continue_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Validate the card details and mark the order paid.
    ///
    /// A rejected payment leaves the order as it was and hands it back inside the error.
    async fn pay(
        &self,
        user: UserUuid,
        order: OrderUuid,
        payment: PaymentDetails,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Delete an unpaid order together with its items.
    async fn cancel(&self, user: UserUuid, order: OrderUuid) -> Result<(), OrdersServiceError>;

    /// Acknowledge a refund request on a paid order without changing it.
    async fn request_refund(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<RefundAcknowledgement, OrdersServiceError>;

    /// The user's orders, newest first, optionally filtered by status.
    async fn order_history(
        &self,
        user: UserUuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{orders::data::ShippingField, payments::PaymentError, products::ProductsService},
        test::{TestContext, helpers::shipping},
    };

    use super::*;

    fn valid_payment() -> PaymentDetails {
        PaymentDetails::new("4111 1111 1111 1111", "123", "12/30")
    }

    async fn placed_order(ctx: &TestContext, user: UserUuid) -> TestResult<OrderRecord> {
        let product = ctx.create_product("Croissant", Decimal::new(250, 2)).await?;

        let mut cart = Cart::new();
        cart.add(product.uuid, &product.name, product.price, 1);

        Ok(ctx.orders.checkout(user, shipping(), &mut cart).await?)
    }

    #[tokio::test]
    async fn checkout_creates_order_and_clears_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let croissant = ctx.create_product("Croissant", Decimal::new(250, 2)).await?;

        let mut cart = Cart::new();
        cart.add(croissant.uuid, &croissant.name, croissant.price, 3);

        let order = ctx.orders.checkout(user, shipping(), &mut cart).await?;

        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert!(!order.paid);
        assert_eq!(order.total_price, Decimal::new(750, 2));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].unit_price, Decimal::new(250, 2));
        assert!(cart.is_empty());

        let stored = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(stored, order);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_uses_cart_price_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let bun = ctx.create_product("Bun", Decimal::new(90, 2)).await?;

        let mut cart = Cart::new();
        cart.add(bun.uuid, &bun.name, bun.price, 2);

        ctx.products
            .update_product(
                bun.uuid,
                crate::domain::products::data::ProductUpdate {
                    name: "Bun".to_string(),
                    price: Decimal::new(120, 2),
                },
            )
            .await?;

        let order = ctx.orders.checkout(user, shipping(), &mut cart).await?;

        assert_eq!(order.total_price, Decimal::new(180, 2));

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empty_cart_is_rejected() {
        let ctx = TestContext::new().await;
        let mut cart = Cart::new();

        let result = ctx
            .orders
            .checkout(UserUuid::new(), shipping(), &mut cart)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(ValidationError::EmptyCart))
            ),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn checkout_missing_shipping_fields_keeps_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let rye = ctx.create_product("Rye", Decimal::new(500, 2)).await?;

        let mut cart = Cart::new();
        cart.add(rye.uuid, &rye.name, rye.price, 1);

        let result = ctx
            .orders
            .checkout(user, ShippingInfo::new("Ann Baker", " ", ""), &mut cart)
            .await;

        let Err(OrdersServiceError::Validation(ValidationError::MissingFields(fields))) = result
        else {
            panic!("expected MissingFields, got {result:?}");
        };

        assert_eq!(fields.as_slice(), [ShippingField::Address, ShippingField::Phone]);
        assert_eq!(cart.len(), 1);
        assert!(ctx.orders.order_history(user, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_deleted_product_stores_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let rye = ctx.create_product("Rye", Decimal::new(500, 2)).await?;
        let scone = ctx.create_product("Scone", Decimal::new(180, 2)).await?;

        let mut cart = Cart::new();
        cart.add(rye.uuid, &rye.name, rye.price, 1);
        cart.add(scone.uuid, &scone.name, scone.price, 2);

        ctx.products.delete_product(scone.uuid).await?;

        let before = cart.clone();
        let result = ctx.orders.checkout(user, shipping(), &mut cart).await;

        assert!(
            matches!(result, Err(OrdersServiceError::ProductUnavailable(product)) if product == scone.uuid),
            "expected ProductUnavailable, got {result:?}"
        );
        assert_eq!(cart, before);
        assert_eq!(ctx.count_rows("orders").await?, 0);
        assert_eq!(ctx.count_rows("order_items").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_total_beyond_decimal_range_stores_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cake = ctx.create_product("Wedding cake", Decimal::new(9900, 2)).await?;

        let mut cart = Cart::new();
        cart.add(cake.uuid, &cake.name, Decimal::MAX, 2);

        let before = cart.clone();
        let result = ctx.orders.checkout(user, shipping(), &mut cart).await;

        assert!(
            matches!(result, Err(OrdersServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
        assert_eq!(cart, before);
        assert_eq!(ctx.count_rows("orders").await?, 0);
        assert_eq!(ctx.count_rows("order_items").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_of_another_user_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx, UserUuid::new()).await?;

        let result = ctx.orders.get_order(UserUuid::new(), order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pay_marks_order_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        let paid = ctx.orders.pay(user, order.uuid, valid_payment()).await?;

        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.paid);
        assert_eq!(paid.items, order.items);

        let stored = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(stored.status, OrderStatus::Paid);
        assert!(stored.paid);

        Ok(())
    }

    #[tokio::test]
    async fn pay_with_test_card_is_rejected_and_order_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        let result = ctx
            .orders
            .pay(
                user,
                order.uuid,
                PaymentDetails::new("0000 0000 0000 0000", "123", "12/30"),
            )
            .await;

        let Err(OrdersServiceError::PaymentRejected { order: returned, reason }) = result else {
            panic!("expected PaymentRejected, got {result:?}");
        };

        assert_eq!(reason, PaymentError::TestCardRejected);
        assert_eq!(*returned, order);

        let stored = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(stored.status, OrderStatus::PendingPayment);
        assert!(!stored.paid);

        Ok(())
    }

    #[tokio::test]
    async fn pay_reports_cvv_and_expiry_problems() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        let cvv = ctx
            .orders
            .pay(user, order.uuid, PaymentDetails::new("4111", "12", "12/30"))
            .await;

        let expiry = ctx
            .orders
            .pay(user, order.uuid, PaymentDetails::new("4111", "123", "1230"))
            .await;

        assert!(
            matches!(
                cvv,
                Err(OrdersServiceError::PaymentRejected {
                    reason: PaymentError::InvalidCvv,
                    ..
                })
            ),
            "expected InvalidCvv, got {cvv:?}"
        );
        assert!(
            matches!(
                expiry,
                Err(OrdersServiceError::PaymentRejected {
                    reason: PaymentError::InvalidExpiry,
                    ..
                })
            ),
            "expected InvalidExpiry, got {expiry:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pay_twice_is_an_invalid_transition() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        ctx.orders.pay(user, order.uuid, valid_payment()).await?;

        let result = ctx.orders.pay(user, order.uuid, valid_payment()).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    action: OrderAction::Pay,
                    reason: TransitionRejection::Status(OrderStatus::Paid),
                    ..
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pay_for_another_users_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let order = placed_order(&ctx, owner).await?;

        let result = ctx
            .orders
            .pay(UserUuid::new(), order.uuid, valid_payment())
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    reason: TransitionRejection::NotOwner,
                    ..
                })
            ),
            "expected NotOwner, got {result:?}"
        );

        let stored = ctx.orders.get_order(owner, order.uuid).await?;

        assert_eq!(stored.status, OrderStatus::PendingPayment);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_deletes_pending_order_and_items() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        ctx.orders.cancel(user, order.uuid).await?;

        let result = ctx.orders.get_order(user, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert_eq!(ctx.count_rows("order_items").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_paid_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        ctx.orders.pay(user, order.uuid, valid_payment()).await?;

        let result = ctx.orders.cancel(user, order.uuid).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    action: OrderAction::Cancel,
                    reason: TransitionRejection::Status(OrderStatus::Paid),
                    ..
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );
        assert_eq!(ctx.count_rows("orders").await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_of_another_users_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let order = placed_order(&ctx, owner).await?;

        let result = ctx.orders.cancel(UserUuid::new(), order.uuid).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    action: OrderAction::Cancel,
                    reason: TransitionRejection::NotOwner,
                    ..
                })
            ),
            "expected NotOwner, got {result:?}"
        );
        let stored = ctx.orders.get_order(owner, order.uuid).await?;

        assert_eq!(stored.status, OrderStatus::PendingPayment);
        assert_eq!(stored.items.len(), 1);
        assert_eq!(ctx.count_rows("orders").await?, 1);
        assert_eq!(ctx.count_rows("order_items").await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_unknown_order_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.cancel(UserUuid::new(), OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn refund_is_acknowledged_without_changing_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;
        let paid = ctx.orders.pay(user, order.uuid, valid_payment()).await?;

        let acknowledgement = ctx.orders.request_refund(user, order.uuid).await?;

        assert_eq!(acknowledgement.order_uuid, order.uuid);
        assert_eq!(acknowledgement.total_price, order.total_price);
        assert_eq!(ctx.orders.get_order(user, order.uuid).await?, paid);

        Ok(())
    }

    #[tokio::test]
    async fn refund_for_unpaid_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        let result = ctx.orders.request_refund(user, order.uuid).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    action: OrderAction::RequestRefund,
                    ..
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn refund_for_another_users_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let order = placed_order(&ctx, owner).await?;
        let paid = ctx.orders.pay(owner, order.uuid, valid_payment()).await?;

        let result = ctx.orders.request_refund(UserUuid::new(), order.uuid).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    action: OrderAction::RequestRefund,
                    reason: TransitionRejection::NotOwner,
                    ..
                })
            ),
            "expected NotOwner, got {result:?}"
        );
        assert_eq!(ctx.orders.get_order(owner, order.uuid).await?, paid);

        Ok(())
    }

    #[tokio::test]
    async fn continue_payment_only_for_unpaid_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let order = placed_order(&ctx, user).await?;

        let reopened = ctx.orders.continue_payment(user, order.uuid).await?;

        assert_eq!(reopened.uuid, order.uuid);

        ctx.orders.pay(user, order.uuid, valid_payment()).await?;

        let result = ctx.orders.continue_payment(user, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidTransition { .. })),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_history_is_newest_first_and_filters_by_status() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let first = placed_order(&ctx, user).await?;
        let second = placed_order(&ctx, user).await?;
        placed_order(&ctx, UserUuid::new()).await?;

        ctx.orders.pay(user, first.uuid, valid_payment()).await?;

        let all: Vec<OrderUuid> = ctx
            .orders
            .order_history(user, None)
            .await?
            .into_iter()
            .map(|order| order.uuid)
            .collect();

        let paid = ctx
            .orders
            .order_history(user, Some(OrderStatus::Paid))
            .await?;

        assert_eq!(all, [second.uuid, first.uuid]);
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].uuid, first.uuid);
        assert_eq!(paid[0].items.len(), 1);

        Ok(())
    }
}
