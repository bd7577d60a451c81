//! Business logic services

pub mod catalog;
pub mod circulation;

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::repository::Store;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    store: Arc<dyn Store>,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            circulation: circulation::CirculationService::new(store.clone()),
            store,
        }
    }

    /// Underlying store, for readiness checks and shutdown
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

/// Today's date in the server's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
