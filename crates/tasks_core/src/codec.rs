//! Portable JSON document for moving a task list between installations.
//!
//! Export writes every record with its four fields. Import is lenient per
//! element: malformed fields are normalized rather than rejected, and only a
//! document that does not parse, or is not a list, is refused.

use crate::clock::Clock;
use crate::error::{AppError, ImportError};
use crate::ids::IdAllocator;
use crate::model::{Task, TaskId};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const EXPORT_FILE_NAME: &str = "tasks-export.json";
pub const MAX_IMPORTED_TEXT_CHARS: usize = 120;

pub fn export(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string_pretty(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Parses and normalizes an exported document.
///
/// Ids synthesized here come from `ids`, so they never collide with ids the
/// allocator already handed out or with ids supplied by the document itself.
pub fn import(
    document: &str,
    ids: &mut IdAllocator,
    clock: &dyn Clock,
) -> Result<Vec<Task>, ImportError> {
    let parsed: Value =
        serde_json::from_str(document).map_err(|err| ImportError::Parse(err.to_string()))?;
    let Value::Array(entries) = parsed else {
        return Err(ImportError::NotAList);
    };

    let empty = Map::new();
    let records: Vec<&Map<String, Value>> = entries
        .iter()
        .map(|entry| entry.as_object().unwrap_or(&empty))
        .collect();

    // Supplied ids are reserved up front so synthesized ones cannot land on
    // an id that appears later in the document.
    let mut seen = HashSet::new();
    let supplied: Vec<Option<TaskId>> = records
        .iter()
        .map(|record| {
            supplied_id(record.get("id")).filter(|id| {
                ids.observe(id);
                seen.insert(id.clone())
            })
        })
        .collect();

    let tasks = records
        .iter()
        .zip(supplied)
        .map(|(record, id)| Task {
            id: id.unwrap_or_else(|| ids.next(clock.now_millis())),
            text: truncate_chars(
                &record.get("text").map(js_string).unwrap_or_default(),
                MAX_IMPORTED_TEXT_CHARS,
            ),
            completed: record.get("completed").is_some_and(is_truthy),
            created_at: supplied_timestamp(record.get("createdAt"))
                .unwrap_or_else(|| clock.timestamp()),
        })
        .collect();

    Ok(tasks)
}

fn supplied_id(value: Option<&Value>) -> Option<TaskId> {
    match value? {
        Value::Number(number) => Some(TaskId::Number(number.clone())),
        Value::String(text) => Some(TaskId::Text(text.clone())),
        _ => None,
    }
}

fn supplied_timestamp(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// String conversion the way a browser would render an arbitrary JSON value.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_IMPORTED_TEXT_CHARS, export, import, truncate_chars};
    use crate::clock::FixedClock;
    use crate::error::ImportError;
    use crate::ids::IdAllocator;
    use crate::model::{Task, TaskId};
    use time::macros::datetime;

    fn clock() -> FixedClock {
        FixedClock(datetime!(2025-12-20 08:00:00 UTC))
    }

    fn import_fresh(document: &str) -> Result<Vec<Task>, ImportError> {
        import(document, &mut IdAllocator::default(), &clock())
    }

    #[test]
    fn import_fills_missing_fields() {
        let tasks = import_fresh(r#"[{"text":"buy milk"}]"#).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "buy milk");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].id, TaskId::from(1_766_217_600_000));
        assert_eq!(tasks[0].created_at, "2025-12-20T08:00:00.000Z");
    }

    #[test]
    fn import_rejects_non_list() {
        let err = import_fresh(r#"{"not":"a list"}"#).unwrap_err();
        assert_eq!(err, ImportError::NotAList);
    }

    #[test]
    fn import_rejects_malformed_document() {
        let err = import_fresh("[{\"text\": ").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn import_keeps_supplied_ids_and_timestamps() {
        let tasks = import_fresh(
            r#"[
                {"id": 42, "text": "a", "completed": true, "createdAt": "2024-01-01T00:00:00.000Z"},
                {"id": "x-1", "text": "b"},
                {"id": 1700000000000.25, "text": "c"}
            ]"#,
        )
        .unwrap();

        assert_eq!(tasks[0].id, TaskId::from(42));
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(tasks[1].id, TaskId::from("x-1"));
        assert_eq!(tasks[2].id.to_string(), "1700000000000.25");
    }

    #[test]
    fn import_truncates_text_to_limit() {
        let long = "é".repeat(MAX_IMPORTED_TEXT_CHARS + 30);
        let document = serde_json::json!([{ "text": long }]).to_string();

        let tasks = import_fresh(&document).unwrap();

        assert_eq!(tasks[0].text.chars().count(), MAX_IMPORTED_TEXT_CHARS);
    }

    #[test]
    fn import_does_not_trim_text() {
        let tasks = import_fresh(r#"[{"text": "  spaced  "}]"#).unwrap();
        assert_eq!(tasks[0].text, "  spaced  ");
    }

    #[test]
    fn import_coerces_text_and_completed() {
        let tasks = import_fresh(
            r#"[
                {"text": 12, "completed": 1},
                {"text": true, "completed": "yes"},
                {"text": null, "completed": 0},
                {"text": ["a", null, 3], "completed": ""},
                {"text": {"nested": 1}, "completed": {}},
                "not an object"
            ]"#,
        )
        .unwrap();

        let texts: Vec<&str> = tasks.iter().map(|task| task.text.as_str()).collect();
        let completed: Vec<bool> = tasks.iter().map(|task| task.completed).collect();

        assert_eq!(texts, ["12", "true", "", "a,,3", "[object Object]", ""]);
        assert_eq!(completed, [true, true, false, false, true, false]);
    }

    #[test]
    fn import_accepts_empty_text() {
        let tasks = import_fresh(r#"[{"id": 1, "text": ""}]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "");
    }

    #[test]
    fn import_reissues_duplicate_ids() {
        let tasks = import_fresh(r#"[{"id": 5, "text": "a"}, {"id": 5, "text": "b"}]"#).unwrap();

        assert_eq!(tasks[0].id, TaskId::from(5));
        assert_ne!(tasks[1].id, TaskId::from(5));
    }

    #[test]
    fn synthesized_ids_avoid_ids_supplied_later() {
        let now = 1_766_217_600_000_i64;
        let document = serde_json::json!([
            { "text": "no id" },
            { "id": now, "text": "supplied" }
        ])
        .to_string();

        let tasks = import_fresh(&document).unwrap();

        assert_eq!(tasks[1].id, TaskId::from(now));
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn export_then_import_reproduces_records() {
        let tasks = vec![
            Task {
                id: TaskId::from(1),
                text: "first".to_string(),
                completed: true,
                created_at: "2025-12-01T00:00:00.000Z".to_string(),
            },
            Task {
                id: TaskId::from("two"),
                text: "second".to_string(),
                completed: false,
                created_at: "2025-12-02T00:00:00.000Z".to_string(),
            },
        ];

        let document = export(&tasks).unwrap();

        assert_eq!(import_fresh(&document).unwrap(), tasks);
    }

    #[test]
    fn export_writes_exactly_four_fields() {
        let document = export(&[Task {
            id: TaskId::from(1),
            text: "first".to_string(),
            completed: false,
            created_at: "2025-12-01T00:00:00.000Z".to_string(),
        }])
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();
        let record = parsed[0].as_object().unwrap();
        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(keys, ["completed", "createdAt", "id", "text"]);
        assert!(document.contains('\n'));
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
