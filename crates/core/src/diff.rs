//! Field-level diff between two JSON snapshots of a domain object.
//!
//! Used to describe what an edit command changed in activity feeds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The status of a field in a diff comparison.
///
/// - `Added`     -- present only in the new snapshot.
/// - `Removed`   -- present only in the previous snapshot.
/// - `Changed`   -- present in both with different values.
/// - `Unchanged` -- present in both with identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    /// String representation for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One differing field between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub status: DiffStatus,
    pub previous: Option<Value>,
    pub new: Option<Value>,
}

/// Fields that change on every write and carry no user intent.
const IGNORED_FIELDS: &[&str] = &["updated"];

/// Compare two object snapshots key by key, returning only the fields that
/// differ, ordered by field name. Non-object inputs are treated as empty.
pub fn diff_objects(previous: &Value, new: &Value) -> Vec<FieldChange> {
    let empty = serde_json::Map::new();
    let prev = previous.as_object().unwrap_or(&empty);
    let next = new.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = prev.keys().chain(next.keys()).collect();

    keys.into_iter()
        .filter(|k| !IGNORED_FIELDS.contains(&k.as_str()))
        .filter_map(|key| {
            let (status, before, after) = match (prev.get(key), next.get(key)) {
                (Some(a), Some(b)) if a == b => return None,
                (Some(a), Some(b)) => (DiffStatus::Changed, Some(a), Some(b)),
                (Some(a), None) => (DiffStatus::Removed, Some(a), None),
                (None, Some(b)) => (DiffStatus::Added, None, Some(b)),
                (None, None) => return None,
            };
            Some(FieldChange {
                field: key.clone(),
                status,
                previous: before.cloned(),
                new: after.cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn as_str_returns_correct_strings() {
        assert_eq!(DiffStatus::Added.as_str(), "added");
        assert_eq!(DiffStatus::Removed.as_str(), "removed");
        assert_eq!(DiffStatus::Changed.as_str(), "changed");
        assert_eq!(DiffStatus::Unchanged.as_str(), "unchanged");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", DiffStatus::Changed), "changed");
    }

    #[test]
    fn diff_reports_changed_added_removed() {
        let before = json!({"id": 1, "name": "a", "description": "x"});
        let after = json!({"id": 1, "name": "b", "blindMode": true});
        let changes = diff_objects(&before, &after);

        let fields: Vec<(&str, DiffStatus)> = changes
            .iter()
            .map(|c| (c.field.as_str(), c.status))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("blindMode", DiffStatus::Added),
                ("description", DiffStatus::Removed),
                ("name", DiffStatus::Changed),
            ]
        );
        assert_eq!(changes[2].previous, Some(json!("a")));
        assert_eq!(changes[2].new, Some(json!("b")));
    }

    #[test]
    fn diff_ignores_update_timestamp() {
        let before = json!({"name": "a", "updated": "2024-01-01T00:00:00Z"});
        let after = json!({"name": "a", "updated": "2024-02-01T00:00:00Z"});
        assert!(diff_objects(&before, &after).is_empty());
    }
}
