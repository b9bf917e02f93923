use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A single todo entry. Once persisted, the store is the source of truth on
/// restart; an unpersisted instance is a draft living only in the composer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    /// Manually assigned position. `None` until the first reindex pass;
    /// contiguous `0..N-1` over the collection immediately after one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl Item {
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            notes: notes.into(),
            created_at: Utc::now(),
            completed: false,
            order_index: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    StoredOrder,
    Title,
    Created,
    Completion,
}

impl SortMethod {
    pub const ALL: &'static [SortMethod] = &[
        SortMethod::StoredOrder,
        SortMethod::Title,
        SortMethod::Created,
        SortMethod::Completion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::StoredOrder => "storedOrder",
            SortMethod::Title => "title",
            SortMethod::Created => "created",
            SortMethod::Completion => "completion",
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "storedOrder" => Ok(SortMethod::StoredOrder),
            "title" => Ok(SortMethod::Title),
            "created" => Ok(SortMethod::Created),
            "completion" => Ok(SortMethod::Completion),
            other => Err(anyhow!(
                "Unknown sort method '{}': expected storedOrder|title|created|completion",
                other
            )),
        }
    }
}

/// Fixed demo set used to seed an empty store, with contiguous order indices
/// already assigned.
pub fn sample_items() -> Vec<Item> {
    let seeds: &[(&str, &str, i64, bool)] = &[
        (
            "Buy groceries",
            "Milk, eggs, bread, and vegetables for the week",
            -48,
            true,
        ),
        (
            "Complete Rust tutorial",
            "Finish the chapters on ownership and error handling",
            -120,
            false,
        ),
        (
            "Call dentist",
            "Schedule a checkup appointment for next month",
            -4,
            false,
        ),
        (
            "Fix app bugs",
            "Address the sorting issue and UI glitches in the detail view",
            -24,
            false,
        ),
        (
            "Prepare presentation",
            "Create slides for the team meeting on Friday",
            -12,
            true,
        ),
        (
            "Update resume",
            "Add recent projects and update skills section",
            -168,
            false,
        ),
        (
            "Plan weekend trip",
            "Research hotels and activities for next month's getaway",
            -72,
            false,
        ),
        (
            "Attend yoga class",
            "Thursday 6PM at Downtown Fitness Center",
            -36,
            true,
        ),
        ("Write blog post", "Share learnings about the migration", 0, false),
        (
            "Return package",
            "Drop off at the post office before Friday",
            -36,
            false,
        ),
    ];

    seeds
        .iter()
        .enumerate()
        .map(|(index, (title, notes, hours, completed))| {
            let mut item = Item::new(*title, *notes);
            item.created_at = Utc::now() + Duration::hours(*hours);
            item.completed = *completed;
            item.order_index = Some(index as i64);
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sort_method_round_trips_through_strings() {
        for method in SortMethod::ALL {
            assert_eq!(method.as_str().parse::<SortMethod>().unwrap(), *method);
        }
    }

    #[test]
    fn sort_method_rejects_unknown_tokens() {
        assert!("priority".parse::<SortMethod>().is_err());
        assert!("Title".parse::<SortMethod>().is_err());
    }

    #[test]
    fn new_item_starts_incomplete_and_unindexed() {
        let item = Item::new("Water plants", "");
        assert!(!item.completed);
        assert_eq!(item.order_index, None);
    }

    #[test]
    fn item_serializes_with_camel_case_sort_method() {
        let value = serde_json::to_value(SortMethod::StoredOrder).unwrap();
        assert_eq!(value, serde_json::json!("storedOrder"));

        let mut item = Item::new("Pay bills", "");
        item.order_index = Some(2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["title"], "Pay bills");
        assert_eq!(value["order_index"], 2);
    }

    #[test]
    fn sample_items_carry_contiguous_indices() {
        let samples = sample_items();
        assert_eq!(samples.len(), 10);
        for (index, item) in samples.iter().enumerate() {
            assert_eq!(item.order_index, Some(index as i64));
        }
    }
}
