//! Application state management

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::AuthState;
use parking_lot::RwLock;

/// Authenticated user session, as reported by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub authenticated_at: chrono::DateTime<chrono::Utc>,
}

/// Shared application state
///
/// Holds the configured API client and the process-wide cached auth state.
/// Route guards all read the same cache instead of re-probing the backend
/// on every mount.
pub struct AppState {
    /// Client configuration
    pub config: ClientConfig,

    /// Configured API client (cookie-based session)
    pub api: ApiClient,

    /// Cached session/auth state
    auth: RwLock<AuthState>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        tracing::info!("API client initialized for {}", config.base_url);

        Ok(Self {
            config,
            api,
            auth: RwLock::new(AuthState::Unknown),
        })
    }

    /// Check if the cached state says we are logged in
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.auth.read(), AuthState::Authenticated(_))
    }

    /// Get the cached auth state
    pub fn auth_state(&self) -> AuthState {
        self.auth.read().clone()
    }

    /// Replace the cached auth state
    pub fn set_auth(&self, next: AuthState) {
        *self.auth.write() = next;
    }

    /// Get the current user session, if authenticated
    pub fn current_user(&self) -> Option<UserSession> {
        match &*self.auth.read() {
            AuthState::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }
}
