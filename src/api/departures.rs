//! Departure (study-abroad stay) endpoints

use super::ApiClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartureStatus {
    Planned,
    Ongoing,
    Completed,
    Canceled,
}

/// Payload for registering a departure during onboarding
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturePayload {
    pub user_id: i64,
    pub university_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_type_id: Option<i64>,
    pub country_code: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub status: DepartureStatus,
}

/// Departure service
pub struct DeparturesService;

impl DeparturesService {
    /// Register a departure. The echoed body varies across backend versions,
    /// so it is returned raw; callers pick out what they need.
    pub async fn create(api: &ApiClient, payload: &DeparturePayload) -> Result<Value> {
        tracing::info!(
            "DeparturesService::create to {} starting {}",
            payload.country_code,
            payload.start_date
        );
        let body = serde_json::to_value(payload)?;
        api.post("/departures", None, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_with_wire_labels() {
        let payload = DeparturePayload {
            user_id: 1,
            university_id: 42,
            program_type_id: None,
            country_code: "US".to_string(),
            start_date: "2026-02-28".to_string(),
            end_date: Some("2026-12-20".to_string()),
            status: DepartureStatus::Planned,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "userId": 1,
                "universityId": 42,
                "countryCode": "US",
                "startDate": "2026-02-28",
                "endDate": "2026-12-20",
                "status": "PLANNED",
            })
        );
    }
}
