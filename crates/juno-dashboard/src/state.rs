use crate::account_requests::AccountRequestStore;
use crate::config::ServerConfig;
use juno_sdk::JunoBackend;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Process-wide backend handle, built once at startup.
    pub backend: Arc<dyn JunoBackend>,
    pub config: Arc<ServerConfig>,
    pub account_requests: Arc<AccountRequestStore>,
}

impl AppState {
    /// Create a new app state
    pub fn new(backend: Arc<dyn JunoBackend>, config: ServerConfig) -> Self {
        let account_requests = AccountRequestStore::new(
            &config.account_requests,
            config.max_pending_account_requests,
        );
        Self {
            backend,
            config: Arc::new(config),
            account_requests: Arc::new(account_requests),
        }
    }
}
