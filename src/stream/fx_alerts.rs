//! Live FX alert stream
//!
//! Subscribes to the backend's SSE endpoint and rebroadcasts parsed alerts
//! to any number of in-process listeners. The read loop runs on its own
//! task; a command channel tears it down on disconnect.

use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::stream::sse::SseParser;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::StreamExt;
use parking_lot::RwLock;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use url::Url;

/// Parsed exchange-rate alert payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxAlert {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub base_ccy: Option<String>,
    #[serde(default)]
    pub quote_ccy: Option<String>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ts: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl FxAlert {
    /// Currency pair label, e.g. `USD/KRW`.
    pub fn pair(&self) -> String {
        if let Some(currency) = &self.currency {
            return currency.clone();
        }
        match (&self.base_ccy, &self.quote_ccy) {
            (Some(base), Some(quote)) => format!("{}/{}", base, quote),
            _ => "FX".to_string(),
        }
    }

    /// Key used to suppress back-to-back duplicate toasts.
    pub fn dedup_key(&self) -> String {
        let rate = self.rate.map(|r| r.to_string()).unwrap_or_default();
        let ts = self
            .ts
            .as_ref()
            .or(self.timestamp.as_ref())
            .map(Value::to_string)
            .unwrap_or_default();
        format!("{}-{}-{}-{}", self.kind, self.pair(), rate, ts)
    }

    /// Event time, from an RFC 3339 string or epoch milliseconds.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.ts.as_ref().or(self.timestamp.as_ref())?;
        match raw {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

enum StreamCommand {
    Disconnect,
}

/// Manages the SSE connection lifecycle and fans alerts out over a
/// broadcast channel.
pub struct FxAlertStream {
    http: Client,
    base: Url,
    state: Arc<RwLock<ConnectionState>>,
    command_tx: RwLock<Option<mpsc::Sender<StreamCommand>>>,
    alerts: broadcast::Sender<FxAlert>,
    /// Bumped on every connect; a read task may only touch the shared
    /// state while its own generation is still the current one.
    generation: Arc<AtomicU64>,
}

impl FxAlertStream {
    /// The stream client carries no request timeout: SSE responses are
    /// long-lived by design and heartbeats keep the socket warm.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().cookie_store(true).build()?;
        let (alerts, _) = broadcast::channel(64);
        Ok(Self {
            http,
            base: config.base_url.clone(),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            command_tx: RwLock::new(None),
            alerts,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Open the alert stream for a user. An existing connection is torn
    /// down first so at most one read loop runs at a time.
    pub async fn connect(&self, user_id: i64) -> Result<()> {
        self.disconnect().await;
        // Invalidates any read task still draining its disconnect; a stale
        // task finishing late must not clobber this connection's state.
        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write() = ConnectionState::Connecting;

        let url = format!(
            "{}/fx/alerts/stream/{}",
            self.base.as_str().trim_end_matches('/'),
            user_id
        );
        tracing::info!("connecting to FX alert stream for user {}", user_id);

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| {
                *self.state.write() = ConnectionState::Disconnected;
                AppError::Stream(format!("alert stream connect failed: {}", e))
            })?;
        if !resp.status().is_success() {
            *self.state.write() = ConnectionState::Disconnected;
            return Err(AppError::Stream(format!(
                "alert stream rejected with status {}",
                resp.status()
            )));
        }

        let (command_tx, mut command_rx) = mpsc::channel(4);
        *self.command_tx.write() = Some(command_tx);

        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let alerts = self.alerts.clone();
        let mut body = Box::pin(resp.bytes_stream());

        tokio::spawn(async move {
            let mut parser = SseParser::new();
            loop {
                tokio::select! {
                    chunk = body.next() => {
                        match chunk {
                            Some(Ok(bytes)) => {
                                for event in parser.push(&bytes) {
                                    handle_event(
                                        &event.name,
                                        &event.data,
                                        &alerts,
                                        &state,
                                        &generation,
                                        my_gen,
                                    );
                                }
                            }
                            Some(Err(e)) => {
                                tracing::warn!("FX alert stream read error: {}", e);
                                break;
                            }
                            None => {
                                tracing::info!("FX alert stream closed by server");
                                break;
                            }
                        }
                    }
                    command = command_rx.recv() => {
                        match command {
                            Some(StreamCommand::Disconnect) | None => {
                                tracing::info!("FX alert stream disconnect requested");
                                break;
                            }
                        }
                    }
                }
            }
            mark_disconnected_if_current(&state, &generation, my_gen);
        });

        Ok(())
    }

    /// Tear the stream down if it is running.
    pub async fn disconnect(&self) {
        let sender = self.command_tx.write().take();
        if let Some(sender) = sender {
            let _ = sender.send(StreamCommand::Disconnect).await;
        }
    }

    /// Subscribe to parsed alerts. Each subscriber gets its own cursor.
    pub fn subscribe(&self) -> broadcast::Receiver<FxAlert> {
        self.alerts.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        *self.state.read() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }
}

fn handle_event(
    name: &str,
    data: &str,
    alerts: &broadcast::Sender<FxAlert>,
    state: &Arc<RwLock<ConnectionState>>,
    generation: &AtomicU64,
    my_gen: u64,
) {
    match name {
        "connected" => {
            if generation.load(Ordering::SeqCst) == my_gen {
                *state.write() = ConnectionState::Connected;
            }
            tracing::info!("FX alert stream established");
        }
        "heartbeat" => {
            tracing::trace!("FX alert stream heartbeat");
        }
        "exchange-rate-update" => match serde_json::from_str::<FxAlert>(data) {
            Ok(alert) => {
                // no subscribers is fine; send only fails then
                let _ = alerts.send(alert);
            }
            Err(e) => {
                // a single bad push must not break the connection
                tracing::debug!("dropping malformed FX alert payload: {} ({})", e, data);
            }
        },
        other => {
            tracing::debug!("ignoring unknown FX stream event '{}'", other);
        }
    }
}

/// A read task's exit write is only valid while no newer connection has
/// taken over the shared state.
fn mark_disconnected_if_current(
    state: &RwLock<ConnectionState>,
    generation: &AtomicU64,
    my_gen: u64,
) {
    if generation.load(Ordering::SeqCst) == my_gen {
        *state.write() = ConnectionState::Disconnected;
    }
}
