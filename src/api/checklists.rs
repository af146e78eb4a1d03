//! User checklist endpoints
//!
//! Checklist summaries go through the tolerant normalizer (their `items`
//! snapshot drives the derived progress), while the item editor endpoints
//! use typed DTOs since that part of the contract has been stable.

use super::{decode, ApiClient, Query};
use crate::error::{AppError, Result};
use crate::normalize::checklist::{
    normalize_checklist_summary, sort_checklists, ChecklistListItem, ItemStatus, ItemTag,
    Visibility,
};
use crate::normalize::{coerce_int, resolve, unwrap_list, unwrap_object};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChecklistPayload {
    pub user_id: i64,
    pub departure_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Checklist detail as fetched for the editor and summary pages.
/// `items` stays loosely typed so the progress derivation tolerates drift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetail {
    pub user_checklist_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub departure_id: i64,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Checklist item in the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub uci_id: i64,
    #[serde(default)]
    pub user_checklist_id: i64,
    #[serde(default)]
    pub template_item_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date, nullable
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub tag: ItemTag,
    #[serde(default)]
    pub linked_amount: f64,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChecklistItemPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ItemTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed: Option<bool>,
}

/// Per-field PATCH payload; each mutation is sent as its own call and
/// treated as independent at the resource level.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchChecklistItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ItemTag>,
}

#[derive(Debug, Clone, Default)]
pub struct ListChecklistsParams {
    pub departure_id: Option<i64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl ListChecklistsParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.departure_id {
            query.push(("departureId", id.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            query.push(("size", size.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        query
    }
}

/// Filters for the item list
#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    pub status: Option<ItemStatus>,
    /// `YYYY-MM-DD`
    pub due_before: Option<String>,
    pub departure_id: Option<i64>,
}

/// Checklist service
pub struct ChecklistsService;

impl ChecklistsService {
    /// Create a checklist and return the new id.
    ///
    /// The id is mandatory for everything that follows, so exhausting all
    /// known aliases without finding one is a hard error rather than a
    /// defaulted value.
    pub async fn create(api: &ApiClient, payload: &CreateChecklistPayload) -> Result<i64> {
        tracing::info!(
            "ChecklistsService::create for departure {}",
            payload.departure_id
        );
        let body = serde_json::to_value(payload)?;
        let raw = api.post("/user-checklists", None, Some(&body)).await?;
        extract_checklist_id(&raw)
    }

    /// Fetch one checklist with its item snapshot.
    pub async fn get(api: &ApiClient, checklist_id: i64) -> Result<ChecklistDetail> {
        let raw = api
            .get(&format!("/user-checklists/{}", checklist_id), None)
            .await?;
        decode(unwrap_object(raw))
    }

    /// Update title/visibility.
    pub async fn update(
        api: &ApiClient,
        checklist_id: i64,
        payload: &UpdateChecklistPayload,
    ) -> Result<Value> {
        let body = serde_json::to_value(payload)?;
        api.patch(&format!("/user-checklists/{}", checklist_id), None, Some(&body))
            .await
    }

    /// Update the amount linked to savings withdrawals.
    pub async fn update_linked_amount(
        api: &ApiClient,
        checklist_id: i64,
        linked_amount: f64,
    ) -> Result<Value> {
        let body = json!({ "linkedAmount": linked_amount });
        api.patch(
            &format!("/user-checklists/{}/linked-amount", checklist_id),
            None,
            Some(&body),
        )
        .await
    }

    /// List the user's checklists as normalized, sorted overview rows.
    pub async fn list(
        api: &ApiClient,
        params: &ListChecklistsParams,
    ) -> Result<Vec<ChecklistListItem>> {
        let query = params.to_query();
        let raw = api.get("/user-checklists", Some(&query)).await?;

        let mut rows: Vec<ChecklistListItem> = unwrap_list(&raw)
            .iter()
            .map(normalize_checklist_summary)
            .collect();
        sort_checklists(&mut rows);
        Ok(rows)
    }

    /// Raw checklist lookup by departure (used right after onboarding).
    pub async fn list_by_departure(api: &ApiClient, departure_id: i64) -> Result<Value> {
        let query = [("departureId", departure_id.to_string())];
        api.get("/user-checklists", Some(&query)).await
    }

    /// Fetch the editable items of a checklist.
    pub async fn items(
        api: &ApiClient,
        checklist_id: i64,
        filters: &ItemFilters,
    ) -> Result<Vec<ChecklistItem>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = filters.status {
            query.push(("status", serde_json::to_value(status)?.as_str().unwrap_or("").to_string()));
        }
        if let Some(due_before) = &filters.due_before {
            query.push(("dueBefore", due_before.clone()));
        }
        if let Some(departure_id) = filters.departure_id {
            query.push(("departureId", departure_id.to_string()));
        }
        let query_ref: Option<Query<'_>> = if query.is_empty() { None } else { Some(&query) };

        let raw = api
            .get(&format!("/user-checklists/{}/items", checklist_id), query_ref)
            .await?;
        unwrap_list(&raw).into_iter().map(decode).collect()
    }

    /// Add an item; the server echo is trusted and returned as-is.
    pub async fn add_item(
        api: &ApiClient,
        checklist_id: i64,
        payload: &AddChecklistItemPayload,
    ) -> Result<ChecklistItem> {
        tracing::info!("ChecklistsService::add_item to {}", checklist_id);
        let body = serde_json::to_value(payload)?;
        let raw = api
            .post(
                &format!("/user-checklists/{}/items", checklist_id),
                None,
                Some(&body),
            )
            .await?;
        decode(unwrap_object(raw))
    }

    /// Patch one field set of an item.
    pub async fn patch_item(
        api: &ApiClient,
        uci_id: i64,
        payload: &PatchChecklistItemPayload,
    ) -> Result<Value> {
        let body = serde_json::to_value(payload)?;
        api.patch(&format!("/user-checklists/items/{}", uci_id), None, Some(&body))
            .await
    }

    /// Delete an item. Callers drop it from their in-memory list on success.
    pub async fn delete_item(api: &ApiClient, uci_id: i64) -> Result<()> {
        api.delete(&format!("/user-checklists/items/{}", uci_id), None)
            .await?;
        Ok(())
    }
}

/// Locate the created checklist's id in the response body, trying the known
/// aliases and the nested `data` fallback in order.
fn extract_checklist_id(raw: &Value) -> Result<i64> {
    resolve(raw, &["userChecklistId", "id"])
        .and_then(coerce_int)
        .or_else(|| {
            raw.get("data")
                .and_then(|data| resolve(data, &["userChecklistId", "id"]))
                .and_then(coerce_int)
        })
        .ok_or_else(|| {
            AppError::MissingId(
                "created checklist response carried no userChecklistId in body or data".to_string(),
            )
        })
}
