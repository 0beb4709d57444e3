//! Storefront
//!
//! Session-keyed entry points for the shop. Identity and the cart both come from the
//! session; order operations require a signed-in user.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::{
    context::AppContext,
    domain::{
        carts::{
            CartsServiceError,
            models::{Cart, CartEntry},
        },
        orders::{
            OrderStatus, OrdersServiceError,
            data::ShippingInfo,
            records::{OrderRecord, OrderUuid, RefundAcknowledgement},
        },
        payments::PaymentDetails,
        products::records::ProductUuid,
        sessions::{Session, SessionKey, SessionsError},
        users::UserUuid,
    },
};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("sign in required")]
    Unauthenticated,

    #[error(transparent)]
    Sessions(#[from] SessionsError),

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),
}

#[derive(Clone)]
pub struct Storefront {
    ctx: AppContext,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront").finish_non_exhaustive()
    }
}

impl Storefront {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    async fn session(&self, key: SessionKey) -> Result<Session, StorefrontError> {
        Ok(self.ctx.sessions.load(key).await?)
    }

    async fn signed_in(&self, key: SessionKey) -> Result<(Session, UserUuid), StorefrontError> {
        let session = self.session(key).await?;

        match session.user {
            Some(user) => Ok((session, user)),
            None => Err(StorefrontError::Unauthenticated),
        }
    }

    /// Start a new signed-out session.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn open_session(&self) -> Result<SessionKey, StorefrontError> {
        let session = self.session(SessionKey::new()).await?;

        Ok(self.ctx.sessions.save(session).await?.key)
    }

    /// The session's signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn current_user(&self, key: SessionKey) -> Result<Option<UserUuid>, StorefrontError> {
        Ok(self.session(key).await?.user)
    }

    /// Attach an authenticated user to the session, keeping its cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn sign_in(&self, key: SessionKey, user: UserUuid) -> Result<(), StorefrontError> {
        let mut session = self.session(key).await?;

        session.sign_in(user);
        self.ctx.sessions.save(session).await?;

        info!(session_key = %key, user_uuid = %user, "signed in");

        Ok(())
    }

    /// Drop the whole session, cart included.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn sign_out(&self, key: SessionKey) -> Result<(), StorefrontError> {
        self.ctx.sessions.delete(key).await?;

        info!(session_key = %key, "signed out");

        Ok(())
    }

    /// `cart.add`
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError`] for a zero quantity or an unknown product.
    pub async fn cart_add(
        &self,
        key: SessionKey,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartEntry, StorefrontError> {
        let mut session = self.session(key).await?;

        let entry = self
            .ctx
            .carts
            .add_item(&mut session.cart, product, quantity)
            .await?;

        self.ctx.sessions.save(session).await?;

        Ok(entry)
    }

    /// `cart.remove`. Removing a product that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn cart_remove(
        &self,
        key: SessionKey,
        product: ProductUuid,
    ) -> Result<Option<CartEntry>, StorefrontError> {
        let mut session = self.session(key).await?;

        let removed = session.cart.remove(product);

        self.ctx.sessions.save(session).await?;

        Ok(removed)
    }

    /// `cart.clear`
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn cart_clear(&self, key: SessionKey) -> Result<(), StorefrontError> {
        let mut session = self.session(key).await?;

        session.cart.clear();

        self.ctx.sessions.save(session).await?;

        Ok(())
    }

    /// `cart.view`: a snapshot of the session's cart. Use [`Cart::view`] to walk it.
    ///
    /// # Errors
    ///
    /// Returns an error when the session store fails.
    pub async fn cart(&self, key: SessionKey) -> Result<Cart, StorefrontError> {
        Ok(self.session(key).await?.cart)
    }

    /// `checkout.submit`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] for a signed-out session, otherwise
    /// whatever the order builder rejects. The cart is kept on failure.
    pub async fn checkout(
        &self,
        key: SessionKey,
        shipping: ShippingInfo,
    ) -> Result<OrderRecord, StorefrontError> {
        let (mut session, user) = self.signed_in(key).await?;

        let order = self
            .ctx
            .orders
            .checkout(user, shipping, &mut session.cart)
            .await?;

        self.ctx.sessions.save(session).await?;

        Ok(order)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] or the lookup failure.
    pub async fn order(
        &self,
        key: SessionKey,
        order: OrderUuid,
    ) -> Result<OrderRecord, StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.get_order(user, order).await?)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`], or an invalid transition when the
    /// order no longer awaits payment.
    pub async fn continue_payment(
        &self,
        key: SessionKey,
        order: OrderUuid,
    ) -> Result<OrderRecord, StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.continue_payment(user, order).await?)
    }

    /// `order.pay`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] or the state machine's rejection.
    /// A rejected card surfaces as [`OrdersServiceError::PaymentRejected`] carrying the order.
    pub async fn pay(
        &self,
        key: SessionKey,
        order: OrderUuid,
        payment: PaymentDetails,
    ) -> Result<OrderRecord, StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.pay(user, order, payment).await?)
    }

    /// `order.cancel`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] or the state machine's rejection.
    pub async fn cancel(&self, key: SessionKey, order: OrderUuid) -> Result<(), StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.cancel(user, order).await?)
    }

    /// `order.requestRefund`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] or the state machine's rejection.
    pub async fn request_refund(
        &self,
        key: SessionKey,
        order: OrderUuid,
    ) -> Result<RefundAcknowledgement, StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.request_refund(user, order).await?)
    }

    /// `order.history`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Unauthenticated`] or a storage failure.
    pub async fn order_history(
        &self,
        key: SessionKey,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, StorefrontError> {
        let (_, user) = self.signed_in(key).await?;

        Ok(self.ctx.orders.order_history(user, status).await?)
    }
}
