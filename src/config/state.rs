// Application state module
// The single shared instance handed to every connection task

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::store::Store;

/// Application state: configuration plus the record store.
///
/// Constructed once in `main` and passed down by `Arc`; there is no
/// module-level singleton.
pub struct AppState {
    pub config: Config,
    pub store: Store,

    // Cached flag for fast access without touching config on every request
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            store,
            cached_access_log,
        }
    }
}
