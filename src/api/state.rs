//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::PayrollBatch;
use crate::config::{ConfigLoader, PolicyConfig};

/// Shared application state.
///
/// Holds the loaded policy and the batch runner built on it.
#[derive(Clone)]
pub struct AppState {
    policy: Arc<PolicyConfig>,
    batch: PayrollBatch,
}

impl AppState {
    /// Creates a new application state from a loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let policy = Arc::new(config.into_policy());
        Self {
            batch: PayrollBatch::new(Arc::clone(&policy)),
            policy,
        }
    }

    /// Replaces the batch runner's concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.batch = self.batch.with_concurrency(concurrency);
        self
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns the batch runner.
    pub fn batch(&self) -> &PayrollBatch {
        &self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_batch_shares_policy() {
        let state = AppState::new(ConfigLoader::default());
        assert_eq!(state.batch().policy(), state.policy());
    }
}
