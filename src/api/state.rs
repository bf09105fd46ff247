//! Application state for the rules engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ConfigLoader;

use super::dedupe::RequestDeduplicator;

/// Shared application state.
///
/// Contains the loaded company configuration and the duplicate-submission
/// store for the approval endpoint.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration.
    config: Arc<ConfigLoader>,
    /// Recently accepted approval submissions.
    dedupe: Arc<Mutex<RequestDeduplicator>>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        let dedupe = RequestDeduplicator::new(config.dedupe_policy());
        Self {
            config: Arc::new(config),
            dedupe: Arc::new(Mutex::new(dedupe)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Locks the duplicate-submission store.
    ///
    /// A poisoned lock is recovered; the store holds no invariant a panic
    /// could break.
    pub fn dedupe(&self) -> MutexGuard<'_, RequestDeduplicator> {
        self.dedupe.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CompanyMetadata, DedupePolicy, EngineConfig, InvoicePolicy, LeavePolicy, PolicyConfig,
    };

    fn create_test_config() -> ConfigLoader {
        let policy = PolicyConfig {
            company: CompanyMetadata {
                code: "TEST".to_string(),
                name: "Test Jewelers".to_string(),
                country: "LY".to_string(),
            },
            leave: LeavePolicy::default(),
            invoice: InvoicePolicy::default(),
            dedupe: DedupePolicy::default(),
        };
        ConfigLoader::from_config(EngineConfig::new(policy, vec![]))
    }

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_dedupe_store() {
        let state = AppState::new(create_test_config());
        let clone = state.clone();

        state.dedupe().check(b"body", None).unwrap();
        assert!(clone.dedupe().check(b"body", None).is_err());
    }
}
