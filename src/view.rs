//! Derived view state
//!
//! Pure helpers the screens compute from fetched data: D-day countdown,
//! checklist progress, and the calendar aggregation of due dates.

use crate::api::checklists::ChecklistItem;
use crate::normalize::checklist::ItemStatus;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Whole days from `today` to `target` (negative once past).
pub fn days_until(today: NaiveDate, target: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// D-day label: `D-7`, `D-DAY`, `D+3`.
pub fn d_day_label(today: NaiveDate, target: NaiveDate) -> String {
    let days = days_until(today, target);
    if days > 0 {
        format!("D-{}", days)
    } else if days == 0 {
        "D-DAY".to_string()
    } else {
        format!("D+{}", -days)
    }
}

/// Percentage of done items, rounded to the nearest integer. Empty input
/// is 0, not a division error.
pub fn progress_percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u32
}

pub fn done_count(items: &[ChecklistItem]) -> usize {
    items
        .iter()
        .filter(|item| item.status == ItemStatus::Done)
        .count()
}

pub fn checklist_progress_percent(items: &[ChecklistItem]) -> u32 {
    progress_percent(done_count(items), items.len())
}

/// Parse the date part of an ISO string (`2026-03-01` or
/// `2026-03-01T09:00:00`); anything shorter or malformed is `None`.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Group items by due date for the calendar view. Items without a parsable
/// due date are left out; the map iterates in date order.
pub fn calendar_events(items: &[ChecklistItem]) -> BTreeMap<NaiveDate, Vec<&ChecklistItem>> {
    let mut events: BTreeMap<NaiveDate, Vec<&ChecklistItem>> = BTreeMap::new();
    for item in items {
        if let Some(date) = item.due_date.as_deref().and_then(parse_iso_date) {
            events.entry(date).or_default().push(item);
        }
    }
    events
}
