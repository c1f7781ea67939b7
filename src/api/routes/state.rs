use std::sync::Arc;

use crate::dashboard::TechniqueCatalog;
use crate::db::StoreAccessor;

/// Shared application state passed to all Axum handlers via `.with_state()`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreAccessor>,
    pub catalog: Arc<TechniqueCatalog>,
}

impl AppState {
    pub fn new(store: StoreAccessor, catalog: TechniqueCatalog) -> Self {
        Self {
            store: Arc::new(store),
            catalog: Arc::new(catalog),
        }
    }
}
