//! Account record normalization
//!
//! Maps raw account and account-product records into the canonical
//! UI-facing shapes. Every mapper here is pure and total: any input object
//! produces a fully-populated record.

use super::{coerce_int, number_or_zero, resolve, string_or};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical account category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Saving,
    Deposit,
    Fx,
}

/// Canonical currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Krw,
    Usd,
}

/// Normalized account record, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub title: String,
    pub account_no: String,
    pub balance_amount: f64,
    pub currency: Currency,
}

/// Normalized account product (openable account template)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProduct {
    pub id: String,
    pub account_name: String,
    pub bank_name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: Currency,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id_num: Option<i64>,
}

/// Compact account view used by the exchange and my-page screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub number: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            number: account.account_no,
            product_name: account.title,
            account_type: account.account_type,
            currency: account.currency,
            balance: Some(account.balance_amount),
        }
    }
}

/// Map a backend account-type token to the canonical category.
///
/// Known spellings are matched exactly; the substring scan is a documented
/// last resort for spellings the table does not list yet. Unrecognized
/// tokens default to FX rather than erroring.
pub fn match_account_type(raw: &str) -> AccountType {
    let token = raw.trim().to_ascii_uppercase();
    match token.as_str() {
        "SAVING" | "SAVINGS" | "SAVING_REGULAR" | "SAVING_MISSION" | "INSTALLMENT_SAVING" => {
            AccountType::Saving
        }
        "DEPOSIT" | "DEMAND_DEPOSIT" | "CHECKING" | "CHECKING_ACCOUNT" => AccountType::Deposit,
        "FX" | "FX_WALLET" | "FOREIGN_CURRENCY" => AccountType::Fx,
        _ => {
            if token.contains("SAV") {
                AccountType::Saving
            } else if token.contains("DEP") || token.contains("CHK") {
                AccountType::Deposit
            } else {
                AccountType::Fx
            }
        }
    }
}

/// Map a raw currency value to the canonical currency.
///
/// When the field is absent entirely, the default depends on the account
/// type: FX accounts default to USD, everything else to KRW.
pub fn match_currency(raw: Option<&Value>, account_type: AccountType) -> Currency {
    match raw {
        Some(value) => {
            if super::coerce_string(value).to_ascii_uppercase().contains("USD") {
                Currency::Usd
            } else {
                Currency::Krw
            }
        }
        None => {
            if account_type == AccountType::Fx {
                Currency::Usd
            } else {
                Currency::Krw
            }
        }
    }
}

/// Normalize one raw account record.
///
/// `idx` is only used to synthesize a last-resort unique id when no
/// identifier field is present under any known alias.
pub fn normalize_account(raw: &Value, idx: usize) -> Account {
    let id = resolve(raw, &["id", "accountId", "uuid"])
        .map(super::coerce_string)
        .unwrap_or_else(|| format!("acc_{}_{}", Utc::now().timestamp_millis(), idx));

    let account_type = match_account_type(&string_or(raw, &["type", "accountType", "kind"], ""));

    let title = string_or(raw, &["title", "name", "accountName", "productName"], "계좌");
    let account_no = string_or(raw, &["accountNo", "accountNumber", "number"], "");
    let currency = match_currency(resolve(raw, &["currency"]), account_type);

    // Balances are display-only and never negative in the canonical view.
    let balance_amount = number_or_zero(
        raw,
        &["balance", "availableBalance", "currentBalance", "amount"],
    )
    .max(0.0);

    Account {
        id,
        account_type,
        title,
        account_no,
        balance_amount,
        currency,
    }
}

/// Normalize one raw account-product record.
pub fn normalize_account_product(raw: &Value, idx: usize) -> AccountProduct {
    let id = resolve(raw, &["id", "productId"])
        .map(super::coerce_string)
        .unwrap_or_else(|| format!("prod_{}_{}", Utc::now().timestamp_millis(), idx));

    let product_id_num = resolve(raw, &["productId", "id"]).and_then(coerce_int);

    let bank_name = string_or(raw, &["bankName"], "상품");
    let account_name = string_or(raw, &["accountName"], "통장");

    let account_type = match_account_type(&string_or(raw, &["accountTypeName"], ""));
    let currency = match_currency(resolve(raw, &["currency"]), account_type);
    let description = string_or(raw, &["accountDescription", "desc"], "");

    AccountProduct {
        id,
        account_name,
        bank_name,
        account_type,
        currency,
        description,
        product_id_num,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_loose_saving_account() {
        let raw = json!({"accountType": "saving_regular", "amount": "15000", "currency": null});
        let account = normalize_account(&raw, 0);
        assert_eq!(account.account_type, AccountType::Saving);
        assert_eq!(account.balance_amount, 15000.0);
        assert_eq!(account.currency, Currency::Krw);
        assert_eq!(account.title, "계좌");
    }

    #[test]
    fn empty_record_gets_synthesized_id_and_fx_defaults() {
        let account = normalize_account(&json!({}), 2);
        assert!(account.id.starts_with("acc_"));
        assert!(account.id.ends_with("_2"));
        let millis = account
            .id
            .trim_start_matches("acc_")
            .trim_end_matches("_2");
        assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(account.account_type, AccountType::Fx);
        assert_eq!(account.balance_amount, 0.0);
        assert_eq!(account.currency, Currency::Usd);
    }

    #[test]
    fn type_table_covers_known_tokens() {
        assert_eq!(match_account_type("DEMAND_DEPOSIT"), AccountType::Deposit);
        assert_eq!(match_account_type("saving_mission"), AccountType::Saving);
        assert_eq!(match_account_type("fx_wallet"), AccountType::Fx);
    }

    #[test]
    fn type_substring_fallback_still_applies() {
        assert_eq!(match_account_type("MY_SAVE_PLAN"), AccountType::Saving);
        assert_eq!(match_account_type("CHK-001"), AccountType::Deposit);
        assert_eq!(match_account_type("whatever"), AccountType::Fx);
        assert_eq!(match_account_type(""), AccountType::Fx);
    }

    #[test]
    fn deposit_without_currency_defaults_to_krw() {
        let raw = json!({"type": "DEPOSIT"});
        assert_eq!(normalize_account(&raw, 0).currency, Currency::Krw);
    }

    #[test]
    fn usd_substring_wins_regardless_of_case() {
        let raw = json!({"type": "SAVING", "currency": "usd (cents)"});
        assert_eq!(normalize_account(&raw, 0).currency, Currency::Usd);
    }

    #[test]
    fn id_alias_priority_and_numeric_id() {
        let raw = json!({"accountId": 42, "uuid": "u-1"});
        assert_eq!(normalize_account(&raw, 0).id, "42");
    }

    #[test]
    fn mapping_is_idempotent() {
        let raw = json!({
            "id": "a-1",
            "accountType": "DEPOSIT",
            "accountName": "생활비 통장",
            "accountNo": "110-123",
            "availableBalance": 250000,
        });
        assert_eq!(normalize_account(&raw, 0), normalize_account(&raw, 0));
    }

    #[test]
    fn negative_balance_clamps_to_zero() {
        let raw = json!({"id": "a", "balance": -100});
        assert_eq!(normalize_account(&raw, 0).balance_amount, 0.0);
    }

    #[test]
    fn product_keeps_numeric_product_id() {
        let raw = json!({"productId": 9, "bankName": "신한", "accountName": "외화통장", "accountTypeName": "FX"});
        let product = normalize_account_product(&raw, 0);
        assert_eq!(product.product_id_num, Some(9));
        assert_eq!(product.id, "9");
        assert_eq!(product.account_type, AccountType::Fx);
        assert_eq!(product.currency, Currency::Usd);
    }

    #[test]
    fn product_defaults_for_empty_record() {
        let product = normalize_account_product(&json!({}), 1);
        assert!(product.id.starts_with("prod_") && product.id.ends_with("_1"));
        assert_eq!(product.bank_name, "상품");
        assert_eq!(product.account_name, "통장");
        assert_eq!(product.product_id_num, None);
    }

    #[test]
    fn summary_projection_keeps_balance() {
        let raw = json!({"id": "a-1", "type": "DEPOSIT", "accountNo": "110-1", "balance": 5000});
        let summary = AccountSummary::from(normalize_account(&raw, 0));
        assert_eq!(summary.number, "110-1");
        assert_eq!(summary.balance, Some(5000.0));
    }
}
