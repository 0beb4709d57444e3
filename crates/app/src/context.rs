//! App Context

use std::{fmt, sync::Arc};

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    config::{DatabaseConfig, SessionConfig},
    database::{self, Db},
    domain::{
        carts::{CartsService, CatalogCartsService},
        orders::{OrdersService, SqliteOrdersService},
        products::{ProductsService, SqliteProductsService},
        sessions::{MemorySessionStore, SessionStore, SessionsError},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),

    #[error("invalid session settings")]
    Sessions(#[source] SessionsError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub sessions: Arc<dyn SessionStore>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire the services over an open database.
    #[must_use]
    pub fn new(db: Db, sessions: Arc<dyn SessionStore>) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(SqliteProductsService::new(db.clone()));

        Self {
            carts: Arc::new(CatalogCartsService::new(Arc::clone(&products))),
            orders: Arc::new(SqliteOrdersService::new(db)),
            products,
            sessions,
        }
    }

    /// Build application context from configuration, migrating the database first.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or migrated, or the session
    /// lifetime is out of range.
    pub async fn from_config(
        database: &DatabaseConfig,
        session: &SessionConfig,
    ) -> Result<Self, AppInitError> {
        let sessions = MemorySessionStore::from_minutes(session.session_ttl_minutes)
            .map_err(AppInitError::Sessions)?;

        let pool = database::connect(&database.database_url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        Ok(Self::new(Db::new(pool), Arc::new(sessions)))
    }
}
