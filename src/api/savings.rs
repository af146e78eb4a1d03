//! Savings plan endpoints

use super::{decode, ApiClient};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Spring-style page envelope used by the savings transaction feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub size: i64,
    /// Current page number
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub number_of_elements: i64,
    #[serde(default)]
    pub empty: bool,
}

/// The savings account backing a plan
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAccount {
    pub account_id: i64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub bank_code: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_no: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub account_balance: f64,
    #[serde(default)]
    pub daily_transfer_limit: f64,
    #[serde(default)]
    pub one_time_transfer_limit: f64,
    #[serde(default)]
    pub account_create_date: String,
    #[serde(default)]
    pub account_expire_date: String,
    #[serde(default)]
    pub last_transaction_date: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanSummary {
    pub plan_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub withdraw_account_id: i64,
    #[serde(default)]
    pub saving_account_id: i64,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub amount_per_period: f64,
    #[serde(default)]
    pub goal_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanDetail {
    pub plan_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub withdraw_account_id: i64,
    pub saving_account: SavingsAccount,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub amount_per_period: f64,
    #[serde(default)]
    pub goal_amount: f64,
}

/// One processed (or failed) savings transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTxn {
    pub txn_id: i64,
    #[serde(default)]
    pub plan_id: i64,
    #[serde(default)]
    pub schedule_id: i64,
    /// REGULAR or MISSION; kept loose since new types appear server-side
    #[serde(default)]
    pub txn_type: String,
    #[serde(default)]
    pub source_uci_id: Option<i64>,
    #[serde(default)]
    pub requested_at: String,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub amount: f64,
    /// RECEIVED, PROCESSING, POSTED, FAILED, ...
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub idempotency_key: String,
    #[serde(default)]
    pub external_tx_id: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub posting_tx_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanFrequency {
    Monthly,
    Weekly,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavingsPlanRequest {
    pub user_id: i64,
    pub departure_id: i64,
    pub withdraw_account_id: i64,
    /// ISO date
    pub end_date: String,
    pub frequency: PlanFrequency,
    pub amount_per_period: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_weekday: Option<u8>,
}

/// Savings service
pub struct SavingsService;

impl SavingsService {
    /// Page through a plan's transactions, newest processed first.
    pub async fn list_transactions(
        api: &ApiClient,
        plan_id: i64,
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<&str>,
    ) -> Result<Page<SavingsTxn>> {
        let query = [
            ("planId", plan_id.to_string()),
            ("page", page.unwrap_or(0).to_string()),
            ("size", size.unwrap_or(20).to_string()),
            ("sort", sort.unwrap_or("processedAt,desc").to_string()),
        ];
        decode(api.get("/savings/transactions", Some(&query)).await?)
    }

    /// Fetch one plan with its backing savings account.
    pub async fn get_plan(api: &ApiClient, plan_id: i64) -> Result<SavingsPlanDetail> {
        decode(api.get(&format!("/savings/plans/{}", plan_id), None).await?)
    }

    /// List the caller's active plans.
    pub async fn my_plans(api: &ApiClient) -> Result<Vec<SavingsPlanSummary>> {
        let query = [
            ("me", "true".to_string()),
            ("active", "true".to_string()),
        ];
        decode(api.get("/savings", Some(&query)).await?)
    }

    /// Create a savings plan.
    pub async fn create_plan(
        api: &ApiClient,
        request: &CreateSavingsPlanRequest,
    ) -> Result<SavingsPlanSummary> {
        tracing::info!(
            "SavingsService::create_plan for departure {}",
            request.departure_id
        );
        let body = serde_json::to_value(request)?;
        decode(api.post("/savings/plans", None, Some(&body)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_decodes_with_partial_meta() {
        let page: Page<SavingsTxn> = serde_json::from_value(json!({
            "content": [{
                "txnId": 1, "planId": 2, "txnType": "REGULAR",
                "amount": 50000, "status": "POSTED",
            }],
            "totalElements": 1, "totalPages": 1, "size": 20, "number": 0,
        }))
        .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].status, "POSTED");
        assert!(page.content[0].processed_at.is_none());
        assert!(!page.last);
    }
}
