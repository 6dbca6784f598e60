//! Shared application state.

use std::sync::Arc;

use crate::auth::{Credentials, InMemoryTokenStore, TokenStore};
use crate::config::ServiceConfig;
use crate::obs::metrics::ServiceMetrics;
use crate::store::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: SqliteStore,
    credentials: Credentials,
    tokens: Arc<dyn TokenStore>,
    metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(cfg: &ServiceConfig, store: SqliteStore) -> Self {
        let credentials = Credentials::from_users(&cfg.auth.users);
        let tokens: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());
        Self {
            inner: Arc::new(AppStateInner {
                store,
                credentials,
                tokens,
                metrics: ServiceMetrics::default(),
            }),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.inner.store
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }
}
