//! Alert toast stack
//!
//! Pure, timestamp-driven state so the dedup and expiry rules are exact:
//! callers pass `Utc::now()` in and drive expiry from their own tick.

use crate::stream::fx_alerts::FxAlert;
use chrono::{DateTime, Duration, Utc};

const DEFAULT_MAX_STACK: usize = 4;
const DEFAULT_AUTO_CLOSE_MS: u64 = 5_000;

/// A toast currently on screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub alert: FxAlert,
    /// `None` when auto-close is disabled
    pub expires_at: Option<DateTime<Utc>>,
}

/// Bounded stack of alert toasts, newest first
#[derive(Debug)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
    last_key: Option<String>,
    max_stack: usize,
    auto_close_ms: u64,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK, DEFAULT_AUTO_CLOSE_MS)
    }
}

impl ToastStack {
    /// `auto_close_ms` of 0 disables auto-close.
    pub fn new(max_stack: usize, auto_close_ms: u64) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            last_key: None,
            max_stack,
            auto_close_ms,
        }
    }

    /// Push an alert. Returns the toast id, or `None` when the alert is a
    /// back-to-back duplicate of the previous one and was suppressed.
    pub fn push(&mut self, alert: FxAlert, now: DateTime<Utc>) -> Option<u64> {
        let key = alert.dedup_key();
        if self.last_key.as_deref() == Some(key.as_str()) {
            tracing::debug!("suppressing duplicate alert toast: {}", key);
            return None;
        }
        self.last_key = Some(key);

        let id = self.next_id;
        self.next_id += 1;
        let expires_at = if self.auto_close_ms == 0 {
            None
        } else {
            Some(now + Duration::milliseconds(self.auto_close_ms as i64))
        };
        self.toasts.insert(0, Toast { id, alert, expires_at });
        self.toasts.truncate(self.max_stack);
        Some(id)
    }

    /// Drop toasts whose lifetime has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.toasts
            .retain(|toast| toast.expires_at.map(|at| at > now).unwrap_or(true));
    }

    /// Dismiss one toast by id (user click).
    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(kind: &str, rate: f64) -> FxAlert {
        serde_json::from_value(serde_json::json!({
            "type": kind,
            "currency": "USD/KRW",
            "rate": rate,
        }))
        .unwrap()
    }

    #[test]
    fn consecutive_duplicate_is_suppressed() {
        let mut stack = ToastStack::default();
        let now = Utc::now();
        assert!(stack.push(alert("TARGET_HIT", 1350.0), now).is_some());
        assert!(stack.push(alert("TARGET_HIT", 1350.0), now).is_none());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn non_consecutive_duplicate_is_allowed() {
        let mut stack = ToastStack::default();
        let now = Utc::now();
        stack.push(alert("TARGET_HIT", 1350.0), now);
        stack.push(alert("RATE_MOVE", 1351.0), now);
        assert!(stack.push(alert("TARGET_HIT", 1350.0), now).is_some());
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn stack_is_capped_newest_first() {
        let mut stack = ToastStack::default();
        let now = Utc::now();
        for i in 0..6 {
            stack.push(alert("RATE_MOVE", 1300.0 + i as f64), now);
        }
        assert_eq!(stack.len(), 4);
        // the newest push sits at the front
        assert_eq!(stack.toasts()[0].alert.rate, Some(1305.0));
        assert_eq!(stack.toasts()[3].alert.rate, Some(1302.0));
    }

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut stack = ToastStack::new(4, 5_000);
        let now = Utc::now();
        stack.push(alert("TARGET_HIT", 1350.0), now);

        stack.expire(now + Duration::milliseconds(4_999));
        assert_eq!(stack.len(), 1);
        stack.expire(now + Duration::milliseconds(5_001));
        assert!(stack.is_empty());
    }

    #[test]
    fn zero_auto_close_never_expires() {
        let mut stack = ToastStack::new(4, 0);
        let now = Utc::now();
        stack.push(alert("TARGET_HIT", 1350.0), now);
        stack.expire(now + Duration::days(30));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_dismisses_by_id() {
        let mut stack = ToastStack::default();
        let now = Utc::now();
        let id = stack.push(alert("TARGET_HIT", 1350.0), now).unwrap();
        stack.push(alert("RATE_MOVE", 1351.0), now);
        stack.remove(id);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.toasts()[0].alert.kind, "RATE_MOVE");
    }
}
