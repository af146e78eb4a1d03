//! Session cache and route gating
//!
//! One process-wide auth cache backs every route guard: the first guard to
//! run probes `/auth/me` and every later guard reads the cached result
//! until login/logout invalidates it.

use crate::api::auth::{AuthService, LoginPayload};
use crate::error::{AppError, Result};
use crate::state::{AppState, UserSession};
use chrono::Utc;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/checklist";

/// Cached authentication state
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Not yet probed this process
    Unknown,
    Authenticated(UserSession),
    Unauthenticated,
}

/// What a route guard should do for the current navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session probe still pending; hold rendering
    Wait,
    Render,
    RedirectToLogin,
    RedirectToHome,
}

impl RouteDecision {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            RouteDecision::RedirectToLogin => Some(LOGIN_ROUTE),
            RouteDecision::RedirectToHome => Some(HOME_ROUTE),
            _ => None,
        }
    }
}

/// Gate for routes that require a logged-in user.
pub fn protected_route(auth: &AuthState) -> RouteDecision {
    match auth {
        AuthState::Unknown => RouteDecision::Wait,
        AuthState::Authenticated(_) => RouteDecision::Render,
        AuthState::Unauthenticated => RouteDecision::RedirectToLogin,
    }
}

/// Gate for login/sign-up routes, which flip a logged-in user back home.
pub fn public_only_route(auth: &AuthState) -> RouteDecision {
    match auth {
        AuthState::Unknown => RouteDecision::Wait,
        AuthState::Authenticated(_) => RouteDecision::RedirectToHome,
        AuthState::Unauthenticated => RouteDecision::Render,
    }
}

/// Session service
pub struct SessionService;

impl SessionService {
    /// Resolve the auth state, probing the backend only when the cache is
    /// still `Unknown`.
    ///
    /// Auth rejections are cached as `Unauthenticated`. Transport failures
    /// also report `Unauthenticated` for this navigation but leave the
    /// cache `Unknown`, so the next navigation retries the probe.
    pub async fn probe(state: &AppState) -> AuthState {
        let cached = state.auth_state();
        if cached != AuthState::Unknown {
            return cached;
        }

        match AuthService::me(&state.api).await {
            Ok(me) => {
                let session = UserSession {
                    user_id: me.user_id,
                    email: me.email,
                    authenticated_at: Utc::now(),
                };
                let next = AuthState::Authenticated(session);
                state.set_auth(next.clone());
                next
            }
            Err(AppError::Auth(_)) | Err(AppError::Api { status: 401, .. })
            | Err(AppError::Api { status: 403, .. }) => {
                state.set_auth(AuthState::Unauthenticated);
                AuthState::Unauthenticated
            }
            Err(e) => {
                tracing::warn!("session probe failed without an auth verdict: {}", e);
                AuthState::Unauthenticated
            }
        }
    }

    /// Log in and seed the cache from the response.
    pub async fn login(state: &AppState, payload: &LoginPayload) -> Result<UserSession> {
        let response = AuthService::login(&state.api, payload).await?;
        let session = UserSession {
            user_id: response.user_id,
            email: response.email.or_else(|| Some(payload.email.clone())),
            authenticated_at: Utc::now(),
        };
        state.set_auth(AuthState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Log out and drop the cached session. The cache is cleared even if
    /// the server call fails; local state must not outlive intent.
    pub async fn logout(state: &AppState) -> Result<()> {
        let result = AuthService::logout(&state.api).await;
        state.set_auth(AuthState::Unauthenticated);
        result
    }

    /// Force the next probe to hit the backend again.
    pub fn invalidate(state: &AppState) {
        state.set_auth(AuthState::Unknown);
    }
}
