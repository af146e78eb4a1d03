//! FX transaction history endpoints

use super::ApiClient;
use crate::error::Result;
use crate::normalize::fx::{normalize_fx_transaction, FxTransaction};
use crate::normalize::unwrap_list;

/// FX service (history only; live alerts come from the stream layer)
pub struct FxService;

impl FxService {
    /// Fetch a user's FX exchange history for an account, normalized.
    ///
    /// Dates are `YYYY-MM-DD`; the server treats the range as inclusive.
    pub async fn fetch_transactions(
        api: &ApiClient,
        user_id: i64,
        account_no: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<FxTransaction>> {
        tracing::info!(
            "FxService::fetch_transactions {} {}..{}",
            account_no,
            start_date,
            end_date
        );
        let query = [
            ("userId", user_id.to_string()),
            ("accountNo", account_no.to_string()),
            ("startDate", start_date.to_string()),
            ("endDate", end_date.to_string()),
        ];
        let raw = api.get("/fx/transactions", Some(&query)).await?;
        Ok(unwrap_list(&raw)
            .iter()
            .enumerate()
            .map(|(idx, item)| normalize_fx_transaction(item, idx))
            .collect())
    }
}
