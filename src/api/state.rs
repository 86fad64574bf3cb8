//! Application state for the Workforce Analytics API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::repository::RecordRepository;

/// Shared application state.
///
/// Holds the loaded policies and the record repository, both immutable for
/// the lifetime of the server.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    repository: Arc<dyn RecordRepository>,
}

impl AppState {
    /// Creates the state from a loaded configuration and a repository.
    pub fn new<R>(config: ConfigLoader, repository: R) -> Self
    where
        R: RecordRepository + 'static,
    {
        Self {
            config: Arc::new(config),
            repository: Arc::new(repository),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the record repository.
    pub fn repository(&self) -> &dyn RecordRepository {
        self.repository.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_state_exposes_repository() {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        let state = AppState::new(config, InMemoryRepository::default());
        let employees = state
            .repository()
            .employees(&crate::repository::EmployeeFilter::default())
            .unwrap();
        assert!(employees.is_empty());
    }
}
