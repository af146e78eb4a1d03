//! Account endpoints
//!
//! The account endpoints are the ones with the most historical shape drift,
//! so every list/detail response goes through the normalization layer
//! rather than strict typed decoding.

use super::{decode, ApiClient};
use crate::error::{AppError, Result};
use crate::normalize::account::{
    normalize_account, normalize_account_product, Account, AccountProduct, AccountSummary,
};
use crate::normalize::{coerce_int, unwrap_list, unwrap_object};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Demand-deposit account as returned by the banking bridge
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAccount {
    pub account_id: i64,
    #[serde(default)]
    pub bank_code: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub account_no: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_type_code: String,
    #[serde(default)]
    pub account_type_name: String,
    #[serde(default)]
    pub account_balance: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub daily_transfer_limit: f64,
    #[serde(default)]
    pub one_time_transfer_limit: f64,
    #[serde(default)]
    pub account_created_date: String,
    #[serde(default)]
    pub account_expiry_date: String,
    #[serde(default)]
    pub last_transaction_date: String,
}

/// One ledger entry of an account's transaction history
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransaction {
    pub transaction_unique_no: i64,
    /// `YYYYMMDD`
    #[serde(default)]
    pub transaction_date: String,
    /// `HHmmss`
    #[serde(default)]
    pub transaction_time: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_type_name: String,
    #[serde(default)]
    pub transaction_account_no: Option<String>,
    #[serde(default)]
    pub transaction_balance: f64,
    #[serde(default)]
    pub transaction_after_balance: f64,
    #[serde(default)]
    pub transaction_summary: String,
    #[serde(default)]
    pub transaction_memo: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TransactionRec {
    #[serde(default)]
    list: Vec<AccountTransaction>,
}

// The banking bridge wraps histories in a legacy Header/REC envelope.
#[derive(Debug, Clone, Deserialize)]
struct TransactionEnvelope {
    #[serde(rename = "REC", default)]
    rec: Option<TransactionRec>,
}

/// Filters for a transaction-history query
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub account_id: i64,
    /// `YYYYMMDD`
    pub start_date: String,
    /// `YYYYMMDD`
    pub end_date: String,
    /// `A` all, `1` deposits, `2` withdrawals
    pub transaction_type: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawReceipt {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub account_no: String,
}

/// Request body for opening an account from a product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<f64>,
}

/// Account service
pub struct AccountsService;

impl AccountsService {
    /// List the user's accounts, normalized.
    pub async fn fetch_accounts(api: &ApiClient) -> Result<Vec<Account>> {
        tracing::info!("AccountsService::fetch_accounts");
        let raw = api.get("/accounts", None).await?;
        Ok(unwrap_list(&raw)
            .iter()
            .enumerate()
            .map(|(idx, item)| normalize_account(item, idx))
            .collect())
    }

    /// Same list, projected to the compact summary view.
    pub async fn fetch_my_accounts(
        api: &ApiClient,
        user_id: Option<i64>,
    ) -> Result<Vec<AccountSummary>> {
        let query;
        let query_ref = match user_id {
            Some(id) => {
                query = [("userId", id.to_string())];
                Some(&query[..])
            }
            None => None,
        };
        let raw = api.get("/accounts", query_ref).await?;
        Ok(unwrap_list(&raw)
            .iter()
            .enumerate()
            .map(|(idx, item)| AccountSummary::from(normalize_account(item, idx)))
            .collect())
    }

    /// List openable account products, normalized.
    pub async fn fetch_account_products(api: &ApiClient) -> Result<Vec<AccountProduct>> {
        tracing::info!("AccountsService::fetch_account_products");
        let raw = api.get("/accounts/products", None).await?;
        Ok(unwrap_list(&raw)
            .iter()
            .enumerate()
            .map(|(idx, item)| normalize_account_product(item, idx))
            .collect())
    }

    /// Open an account from a product. The echoed account comes back bare
    /// or enveloped; either way it is normalized.
    pub async fn create_account(
        api: &ApiClient,
        request: &CreateAccountRequest,
    ) -> Result<Account> {
        tracing::info!("AccountsService::create_account product={}", request.product_id);
        let body = serde_json::to_value(request)?;
        let raw = api
            .post(
                &format!("/accounts/products/{}", request.product_id),
                None,
                Some(&body),
            )
            .await?;
        Ok(normalize_account(&unwrap_object(raw), 0))
    }

    /// List demand-deposit accounts from the banking bridge.
    pub async fn fetch_demand_deposit_accounts(api: &ApiClient) -> Result<Vec<DepositAccount>> {
        let raw = api.get("/banks/demand-deposit/accounts", None).await?;
        let list = unwrap_list(&raw);
        list.into_iter().map(decode).collect()
    }

    /// Look up one demand-deposit account by id, degrading any failure
    /// (missing account included) to `None`.
    pub async fn try_get_account_by_id(
        api: &ApiClient,
        account_id: i64,
    ) -> Result<Option<DepositAccount>> {
        match api.get(&format!("/accounts/{}", account_id), None).await {
            Ok(raw) => Ok(decode(unwrap_object(raw)).ok()),
            Err(e) => {
                tracing::warn!("account lookup failed for {}: {}", account_id, e);
                Ok(None)
            }
        }
    }

    /// Resolve an account number to its internal id.
    ///
    /// The response arrives as a bare number, `{id}`, or `{data}`; any
    /// lookup failure degrades to `None` so callers can fall back.
    pub async fn find_account_id_by_account_no(
        api: &ApiClient,
        account_no: &str,
    ) -> Result<Option<i64>> {
        let path = format!("/accounts/accounts/{}/find", urlencoding::encode(account_no));
        let raw = match api.get(&path, None).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("account id lookup failed for {}: {}", account_no, e);
                return Ok(None);
            }
        };

        let id = coerce_int(&raw)
            .or_else(|| raw.get("id").and_then(coerce_int))
            .or_else(|| raw.get("data").and_then(coerce_int));
        Ok(id)
    }

    /// Withdraw from a demand-deposit account (used when a checklist item
    /// linked to savings is completed).
    pub async fn withdraw(
        api: &ApiClient,
        account_no: &str,
        amount: f64,
        description: Option<&str>,
    ) -> Result<WithdrawReceipt> {
        if amount <= 0.0 {
            return Err(AppError::Validation(
                "withdraw amount must be positive".to_string(),
            ));
        }
        tracing::info!("AccountsService::withdraw {} from {}", amount, account_no);

        let body = json!({
            "amount": amount,
            "description": description.unwrap_or("체크리스트 항목 완료"),
        });
        let path = format!(
            "/banks/demand-deposit/accounts/{}/withdraw",
            urlencoding::encode(account_no)
        );
        decode(unwrap_object(api.post(&path, None, Some(&body)).await?))
    }

    /// Fetch an account's transaction history, flattened out of the legacy
    /// Header/REC envelope.
    pub async fn fetch_transactions(
        api: &ApiClient,
        query: &TransactionQuery,
    ) -> Result<Vec<AccountTransaction>> {
        let params = [
            ("startDate", query.start_date.clone()),
            ("endDate", query.end_date.clone()),
            (
                "transactionType",
                query.transaction_type.clone().unwrap_or_else(|| "A".to_string()),
            ),
            (
                "orderByType",
                query.order_by.clone().unwrap_or_else(|| "DESC".to_string()),
            ),
        ];
        let raw = api
            .get(
                &format!("/accounts/accounts/{}/transactions", query.account_id),
                Some(&params),
            )
            .await?;

        let envelope: TransactionEnvelope = decode(raw)?;
        Ok(envelope.rec.map(|rec| rec.list).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{serve_script, Exchange};
    use crate::config::ClientConfig;
    use url::Url;

    fn client_for(base: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: std::time::Duration::from_secs(5),
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn account_lookup_by_id_returns_the_account() {
        let (base, _log) = serve_script(vec![Exchange {
            status: "200 OK",
            body: r#"{"accountId": 5, "bankName": "신한", "accountNo": "110-123", "accountBalance": 50000}"#,
        }])
        .await;

        let client = client_for(&base);
        let account = AccountsService::try_get_account_by_id(&client, 5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.account_id, 5);
        assert_eq!(account.account_balance, 50000.0);
    }

    #[tokio::test]
    async fn account_lookup_by_id_degrades_to_none() {
        let (base, _log) = serve_script(vec![Exchange {
            status: "404 Not Found",
            body: r#"{"message":"계좌를 찾을 수 없습니다"}"#,
        }])
        .await;

        let client = client_for(&base);
        let found = AccountsService::try_get_account_by_id(&client, 99)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn transaction_envelope_tolerates_missing_rec() {
        let envelope: TransactionEnvelope =
            serde_json::from_value(json!({"Header": null})).unwrap();
        assert!(envelope.rec.is_none());

        let envelope: TransactionEnvelope = serde_json::from_value(json!({
            "Header": null,
            "REC": {"totalCount": "1", "list": [{
                "transactionUniqueNo": 10,
                "transactionDate": "20250801",
                "transactionTime": "093000",
                "transactionType": "2",
                "transactionTypeName": "출금",
                "transactionBalance": 50000,
                "transactionAfterBalance": 450000,
            }]}
        }))
        .unwrap();
        let list = envelope.rec.unwrap().list;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].transaction_unique_no, 10);
        assert_eq!(list[0].transaction_after_balance, 450000.0);
    }
}
