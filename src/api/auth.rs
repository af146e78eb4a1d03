//! Authentication endpoints (cookie-based)
//!
//! The backend issues access/refresh tokens as HttpOnly cookies; response
//! bodies carry only a message plus optional email and user id.

use super::{decode, ApiClient};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Sign-up payload, sent as the JSON `user` part of a multipart form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub gender: Gender,
    /// Birth date, `YYYY-MM-DD`
    pub birth: String,
    pub home_university_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user. The optional profile image travels as a second
    /// multipart part next to the JSON payload.
    pub async fn sign_up(
        api: &ApiClient,
        user: &SignUpPayload,
        profile_image: Option<Vec<u8>>,
    ) -> Result<AuthResponse> {
        tracing::info!("AuthService::sign_up for {}", user.email);

        let user_json = serde_json::to_string(user)?;
        let mut form = reqwest::multipart::Form::new().part(
            "user",
            reqwest::multipart::Part::text(user_json)
                .mime_str("application/json")
                .map_err(crate::error::AppError::Http)?,
        );
        if let Some(bytes) = profile_image {
            form = form.part(
                "profileImage",
                reqwest::multipart::Part::bytes(bytes).file_name("profile"),
            );
        }

        decode(api.post_multipart("/auth/register", form).await?)
    }

    /// Log in. Cookies are stored by the client; the body only echoes
    /// message/email/userId.
    pub async fn login(api: &ApiClient, payload: &LoginPayload) -> Result<AuthResponse> {
        tracing::info!("AuthService::login for {}", payload.email);
        let body = serde_json::to_value(payload)?;
        decode(api.post("/auth/login", None, Some(&body)).await?)
    }

    /// Log out; the server clears the session cookies.
    pub async fn logout(api: &ApiClient) -> Result<()> {
        tracing::info!("AuthService::logout");
        api.post("/auth/logout", None, None).await?;
        Ok(())
    }

    /// "Who am I" probe used by the route guards.
    pub async fn me(api: &ApiClient) -> Result<AuthResponse> {
        decode(api.get("/auth/me", None).await?)
    }

    /// Explicitly refresh the access cookie from the refresh cookie.
    pub async fn refresh(api: &ApiClient) -> Result<()> {
        api.post("/auth/refresh", None, None).await?;
        Ok(())
    }
}
