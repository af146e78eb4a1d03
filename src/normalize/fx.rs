//! FX transaction normalization

use super::{number_or_zero, resolve};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized currency-exchange transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxTransaction {
    pub id: String,
    /// ISO timestamp of the exchange
    pub at: String,
    /// Applied rate, KRW per USD
    pub rate_krw_per_usd: f64,
    /// USD amount credited
    pub usd_amount: f64,
    /// KRW amount withdrawn
    pub withdraw_krw: f64,
}

/// Normalize one raw FX transaction record.
pub fn normalize_fx_transaction(raw: &Value, idx: usize) -> FxTransaction {
    let id = resolve(raw, &["id", "txId", "transactionId", "uuid"])
        .map(super::coerce_string)
        .unwrap_or_else(|| format!("fx_{}_{}", Utc::now().timestamp_millis(), idx));

    let at = resolve(
        raw,
        &["at", "createdAt", "transactedAt", "timestamp", "dateTime", "date"],
    )
    .map(super::coerce_string)
    .unwrap_or_else(|| Utc::now().to_rfc3339());

    FxTransaction {
        id,
        at,
        rate_krw_per_usd: number_or_zero(
            raw,
            &["rateKrwPerUsd", "rate", "appliedRate", "krwPerUsd", "fxRate"],
        ),
        usd_amount: number_or_zero(raw, &["usdAmount", "amountUsd", "baseAmount", "originAmountUsd"]),
        withdraw_krw: number_or_zero(raw, &["withdrawKrw", "amountKrw", "withdrawAmount", "payoutKrw"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_legacy_aliases() {
        let raw = json!({
            "transactionId": 77,
            "transactedAt": "2025-08-01T09:30:00Z",
            "appliedRate": "1385.2",
            "amountUsd": 100,
            "payoutKrw": 138520,
        });
        let txn = normalize_fx_transaction(&raw, 0);
        assert_eq!(txn.id, "77");
        assert_eq!(txn.at, "2025-08-01T09:30:00Z");
        assert_eq!(txn.rate_krw_per_usd, 1385.2);
        assert_eq!(txn.usd_amount, 100.0);
        assert_eq!(txn.withdraw_krw, 138520.0);
    }

    #[test]
    fn empty_record_defaults_amounts_to_zero() {
        let txn = normalize_fx_transaction(&json!({}), 3);
        assert!(txn.id.starts_with("fx_") && txn.id.ends_with("_3"));
        assert_eq!(txn.rate_krw_per_usd, 0.0);
        assert_eq!(txn.usd_amount, 0.0);
        assert_eq!(txn.withdraw_krw, 0.0);
        assert!(!txn.at.is_empty());
    }
}
