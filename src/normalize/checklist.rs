//! Checklist normalization and status derivation

use super::{coerce_int, resolve, string_or, unwrap_list};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Checklist item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Todo,
    Doing,
    Done,
    Skip,
}

/// Checklist item tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemTag {
    #[default]
    None,
    Saving,
    Exchange,
    Insurance,
    Document,
    Etc,
}

/// Backend visibility tri-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

/// Two-state visibility badge shown in lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityLabel {
    Public,
    Private,
}

/// Derived checklist progress, in display form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "미완료")]
    NotStarted,
    #[serde(rename = "완료")]
    Completed,
}

impl Progress {
    pub fn label(self) -> &'static str {
        match self {
            Progress::InProgress => "진행중",
            Progress::NotStarted => "미완료",
            Progress::Completed => "완료",
        }
    }

    /// List ordering: in-progress first, completed last
    fn rank(self) -> u8 {
        match self {
            Progress::InProgress => 0,
            Progress::NotStarted => 1,
            Progress::Completed => 2,
        }
    }
}

/// One row of the checklist overview list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistListItem {
    pub id: i64,
    pub visibility: VisibilityLabel,
    pub title: String,
    pub status: Progress,
}

/// Collapse the backend tri-state into the two-state badge.
/// UNLISTED is treated as a public badge.
pub fn visibility_label(visibility: Visibility) -> VisibilityLabel {
    match visibility {
        Visibility::Private => VisibilityLabel::Private,
        Visibility::Public | Visibility::Unlisted => VisibilityLabel::Public,
    }
}

/// Derive the checklist progress from a snapshot of its items.
///
/// Any DOING item means in-progress; a non-empty all-DONE list is complete;
/// everything else, the empty list included, is not-started. Pure and
/// total, never persisted independently.
pub fn progress_from_items(items: &[Value]) -> Progress {
    let status_of = |item: &Value| string_or(item, &["status"], "").to_ascii_uppercase();

    if items.iter().any(|item| status_of(item) == "DOING") {
        return Progress::InProgress;
    }
    if !items.is_empty() && items.iter().all(|item| status_of(item) == "DONE") {
        return Progress::Completed;
    }
    Progress::NotStarted
}

/// Normalize one raw checklist summary into an overview row.
pub fn normalize_checklist_summary(raw: &Value) -> ChecklistListItem {
    let id = resolve(raw, &["userChecklistId", "id"])
        .and_then(coerce_int)
        .unwrap_or_default();

    let visibility = match string_or(raw, &["visibility"], "")
        .to_ascii_uppercase()
        .as_str()
    {
        "PRIVATE" => Visibility::Private,
        "UNLISTED" => Visibility::Unlisted,
        _ => Visibility::Public,
    };

    let items = raw
        .get("items")
        .map(unwrap_list)
        .unwrap_or_default();

    ChecklistListItem {
        id,
        visibility: visibility_label(visibility),
        title: string_or(raw, &["title"], ""),
        status: progress_from_items(&items),
    }
}

/// Sort overview rows: in-progress, then not-started, then completed.
pub fn sort_checklists(rows: &mut [ChecklistListItem]) {
    rows.sort_by_key(|row| row.status.rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_item_list_is_not_started() {
        assert_eq!(progress_from_items(&[]), Progress::NotStarted);
    }

    #[test]
    fn any_doing_item_wins() {
        let items = vec![json!({"status": "DOING"}), json!({"status": "DONE"})];
        assert_eq!(progress_from_items(&items), Progress::InProgress);
        let items = vec![
            json!({"status": "DONE"}),
            json!({"status": "DOING"}),
            json!({"status": "SKIP"}),
        ];
        assert_eq!(progress_from_items(&items), Progress::InProgress);
    }

    #[test]
    fn all_done_is_completed() {
        let items = vec![json!({"status": "DONE"}), json!({"status": "DONE"})];
        assert_eq!(progress_from_items(&items), Progress::Completed);
    }

    #[test]
    fn mixed_without_doing_is_not_started() {
        let items = vec![json!({"status": "TODO"}), json!({"status": "DONE"})];
        assert_eq!(progress_from_items(&items), Progress::NotStarted);
    }

    #[test]
    fn unlisted_collapses_to_public_badge() {
        assert_eq!(visibility_label(Visibility::Unlisted), VisibilityLabel::Public);
        assert_eq!(visibility_label(Visibility::Public), VisibilityLabel::Public);
        assert_eq!(visibility_label(Visibility::Private), VisibilityLabel::Private);
    }

    #[test]
    fn summary_mapping_and_sorting() {
        let rows_raw = json!([
            {"userChecklistId": 1, "title": "done list", "visibility": "PUBLIC",
             "items": [{"status": "DONE"}]},
            {"userChecklistId": 2, "title": "fresh list", "visibility": "PRIVATE", "items": []},
            {"userChecklistId": 3, "title": "active list", "visibility": "UNLISTED",
             "items": [{"status": "DOING"}, {"status": "TODO"}]},
        ]);

        let mut rows: Vec<ChecklistListItem> = unwrap_list(&rows_raw)
            .iter()
            .map(normalize_checklist_summary)
            .collect();
        sort_checklists(&mut rows);

        assert_eq!(rows[0].id, 3);
        assert_eq!(rows[0].status, Progress::InProgress);
        assert_eq!(rows[0].visibility, VisibilityLabel::Public);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].status, Progress::NotStarted);
        assert_eq!(rows[1].visibility, VisibilityLabel::Private);
        assert_eq!(rows[2].id, 1);
        assert_eq!(rows[2].status, Progress::Completed);
    }

    #[test]
    fn progress_serializes_to_display_labels() {
        assert_eq!(
            serde_json::to_string(&Progress::Completed).unwrap(),
            "\"완료\""
        );
        assert_eq!(Progress::InProgress.label(), "진행중");
    }
}
