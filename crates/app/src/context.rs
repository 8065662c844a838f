//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        returns::{PgReturnsService, ReturnsService},
        stocktakes::{PgStocktakesService, StocktakesService},
        variants::{PgVariantsService, VariantsService},
        warehouse::{PgWarehouseService, WarehouseService},
    },
    notifications::{LogNotifier, Notifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub variants: Arc<dyn VariantsService>,
    pub warehouse: Arc<dyn WarehouseService>,
    pub returns: Arc<dyn ReturnsService>,
    pub stocktakes: Arc<dyn StocktakesService>,
}

impl AppContext {
    /// Build application context from a database URL, announcing return
    /// request changes through the log.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        Self::with_notifier(url, Arc::new(LogNotifier)).await
    }

    /// Build application context with a custom notifier.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn with_notifier(
        url: &str,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool), notifier))
    }

    #[must_use]
    pub fn from_db(db: &Db, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            variants: Arc::new(PgVariantsService::new(db.clone())),
            warehouse: Arc::new(PgWarehouseService::new(db.clone())),
            returns: Arc::new(PgReturnsService::new(db.clone(), notifier)),
            stocktakes: Arc::new(PgStocktakesService::new(db.clone())),
        }
    }
}
