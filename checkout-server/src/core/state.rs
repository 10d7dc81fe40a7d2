use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CatalogService;
use crate::checkout::{CheckoutManager, CheckoutStorage, StorageError};
use crate::core::Config;

/// Server state - shared references to every service singleton
///
/// Cloning is a shallow `Arc` copy, so handlers can take the state by
/// value.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | checkout | Checkout orchestrator (owns the database) |
/// | catalog | In-memory product catalog |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub checkout: Arc<CheckoutManager>,
    pub catalog: Arc<CatalogService>,
}

impl ServerState {
    /// Build the state from configuration, opening the database under
    /// the working directory
    pub fn new(config: Config) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&config.work_dir).ok();
        let storage = CheckoutStorage::open(config.db_path())?;
        Self::with_storage(config, storage)
    }

    /// Build the state on top of an existing storage (tests use the
    /// in-memory backend)
    pub fn with_storage(config: Config, storage: CheckoutStorage) -> Result<Self, StorageError> {
        let catalog = Arc::new(CatalogService::new());
        let mut manager = CheckoutManager::new(
            storage,
            Duration::from_millis(config.checkout_deadline_ms),
        );
        manager.set_catalog_service(catalog.clone());

        Ok(Self {
            config: Arc::new(config),
            checkout: Arc::new(manager),
            catalog,
        })
    }
}
