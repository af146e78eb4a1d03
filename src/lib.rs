//! day0 client - Study-Abroad Preparation Client Layer
//!
//! The client layer behind the day0 pre-departure app: tolerant response
//! normalization for the backend's drifting payload shapes, typed REST
//! services, the live FX alert stream, the cached session used by route
//! guards, and the pure view-state derivations.

pub mod api;
pub mod config;
pub mod error;
pub mod normalize;
pub mod session;
pub mod state;
pub mod stream;
pub mod view;

pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use state::AppState;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging. Call once at startup; `RUST_LOG` overrides
/// the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "day0_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
