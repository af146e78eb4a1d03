//! REST API client layer
//!
//! [`ApiClient`] wraps the HTTP transport with the behavior every resource
//! service shares: cookie-based session auth, a single transparent
//! refresh-and-retry on 401, and uniform decoding of success and error
//! bodies. The per-resource services live in the submodules.

pub mod accounts;
pub mod auth;
pub mod checklists;
pub mod community;
pub mod departures;
pub mod fx;
pub mod savings;
pub mod universities;

use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Query parameters for a request
pub type Query<'a> = &'a [(&'a str, String)];

/// HTTP client for the day0 backend
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client from configuration. The cookie store carries the
    /// HttpOnly session cookies the backend issues on login.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, query: Option<Query<'_>>) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.request(Method::POST, path, query, body).await
    }

    pub async fn patch(
        &self,
        path: &str,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.request(Method::PATCH, path, query, body).await
    }

    pub async fn delete(&self, path: &str, query: Option<Query<'_>>) -> Result<Value> {
        self.request(Method::DELETE, path, query, None).await
    }

    /// Send a request, refreshing the session once on 401.
    ///
    /// Mirrors the session-cookie flow the web client uses: a 401 triggers
    /// one POST `/auth/refresh`, and the original request is retried once
    /// if the refresh succeeds. A second 401 is surfaced as an auth error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut refreshed = false;
        loop {
            let mut req = self
                .http
                .request(method.clone(), self.endpoint(path))
                .header(ACCEPT, "application/json");
            if let Some(q) = query {
                req = req.query(q);
            }
            if let Some(b) = body {
                req = req.json(b);
            }

            let resp = req.send().await?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED && !refreshed {
                refreshed = true;
                tracing::debug!("401 on {} {}, attempting session refresh", method, path);
                if self.try_refresh().await {
                    continue;
                }
            }

            if status == StatusCode::UNAUTHORIZED {
                let body = resp.text().await.unwrap_or_default();
                return Err(AppError::Auth(extract_error_message(&body)));
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(AppError::Api {
                    status: status.as_u16(),
                    message: extract_error_message(&body),
                });
            }

            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }

            let text = resp.text().await?;
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }
    }

    /// Send a multipart request (used by sign-up, which uploads a profile
    /// image alongside a JSON part). No refresh handling: multipart flows
    /// run before a session exists.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn try_refresh(&self) -> bool {
        match self.http.post(self.endpoint("/auth/refresh")).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::debug!("session refresh rejected: {}", resp.status());
                false
            }
            Err(e) => {
                tracing::debug!("session refresh failed: {}", e);
                false
            }
        }
    }
}

/// Decode a response body into a typed DTO.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Best-effort extraction of the backend's `message` field from an error
/// body; falls back to the raw body text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) struct Exchange {
        pub status: &'static str,
        pub body: &'static str,
    }

    /// Serve a fixed script of responses on a loopback port, one
    /// connection per exchange (`Connection: close`), recording each
    /// request line. Returns the base URL and the request log.
    pub(crate) async fn serve_script(
        script: Vec<Exchange>,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let log = Arc::new(Mutex::new(Vec::new()));
        let request_log = Arc::clone(&log);

        tokio::spawn(async move {
            for exchange in script {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap();
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                request_log
                    .lock()
                    .unwrap()
                    .push(request.lines().next().unwrap_or("").to_string());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    exchange.status,
                    exchange.body.len(),
                    exchange.body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
            }
        });

        (base, log)
    }
}
