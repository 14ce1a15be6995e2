//! Shared application state for the likes gateway.
//!
//! Holds the one process-wide counter store (created explicitly at startup by
//! `store::connect`), the service wrapping it, and the metrics registry.

use std::sync::Arc;

use likes_core::{CounterService, CounterStore};

use crate::config::LikesConfig;
use crate::obs::LikesMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: LikesConfig,
    service: CounterService,
    metrics: LikesMetrics,
}

impl AppState {
    pub fn new(cfg: LikesConfig, store: Arc<dyn CounterStore>) -> Self {
        let service = CounterService::with_max_slug_len(store, cfg.store.max_slug_len);
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                service,
                metrics: LikesMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &LikesConfig {
        &self.inner.cfg
    }

    pub fn service(&self) -> &CounterService {
        &self.inner.service
    }

    pub fn store(&self) -> &Arc<dyn CounterStore> {
        self.inner.service.store()
    }

    pub fn metrics(&self) -> &LikesMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("likes_max_slug_len", self.inner.cfg.store.max_slug_len as u64)]
    }
}
