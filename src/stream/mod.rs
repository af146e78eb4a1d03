//! Live data streaming
//!
//! SSE transport, the FX alert connection manager, and the toast stack
//! that presents alerts.

pub mod fx_alerts;
pub mod sse;
pub mod toast;

pub use fx_alerts::{ConnectionState, FxAlert, FxAlertStream};
pub use sse::{SseEvent, SseParser};
pub use toast::{Toast, ToastStack};
