//! Snapshot codec: the JSON array format shared by the persistence slot,
//! export files, and import files.
//!
//! Decoding is done over `serde_json::Value` rather than straight into
//! `MissEntry` so that one bad record can be coerced or dropped without
//! rejecting the whole payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::model::{parse_timestamp, EntryDraft, EntryId, MissEntry, WhyMissed};

/// Fixed slot key under which the collection is persisted.
pub const STORAGE_KEY: &str = "misslog-entries-v1";

/// How strictly raw records are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionMode {
    /// User-supplied files: fill in missing ids, timestamps and reasons.
    Import,
    /// Our own persisted slot: every field must have the right JSON type.
    Hydrate,
}

/// Records that survived coercion, plus how many were discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coerced {
    pub entries: Vec<MissEntry>,
    pub dropped: usize,
}

/// Serialize entries as the pretty-printed snapshot document.
pub fn encode(entries: &[MissEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// Parse a snapshot document down to its top-level array.
pub fn parse_array(raw: &str) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => Ok(items),
        other => Err(ImportError::NotAnArray(json_kind(&other))),
    }
}

/// Check that every element is an object. Import refuses arrays holding
/// anything else rather than dropping them and applying the rest.
pub fn require_records(records: &[Value]) -> Result<(), ImportError> {
    match records.iter().position(|r| !r.is_object()) {
        Some(index) => Err(ImportError::NotARecord {
            index,
            kind: json_kind(&records[index]),
        }),
        None => Ok(()),
    }
}

/// Coerce raw records into entries. Output keeps input order; sorting is
/// the store's job.
pub fn coerce_records(records: &[Value], mode: CoercionMode, now: DateTime<Utc>) -> Coerced {
    let mut coerced = Coerced::default();
    for record in records {
        let entry = match mode {
            CoercionMode::Import => coerce_import(record, now),
            CoercionMode::Hydrate => coerce_hydrate(record, now),
        };
        match entry {
            Some(entry) => coerced.entries.push(entry),
            None => coerced.dropped += 1,
        }
    }
    coerced
}

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("miss-log-{}.json", date.format("%Y-%m-%d"))
}

fn coerce_import(record: &Value, now: DateTime<Utc>) -> Option<MissEntry> {
    let obj = record.as_object()?;

    let id = match obj.get("id") {
        Some(Value::String(id)) if !id.is_empty() => EntryId::from(id.as_str()),
        _ => EntryId::generate(),
    };
    let created_at = obj
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or(now);
    let why_missed = obj
        .get("whyMissed")
        .and_then(Value::as_str)
        .and_then(WhyMissed::from_label)
        .unwrap_or(WhyMissed::Other);
    let tags = match obj.get("tags") {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        _ => Vec::new(),
    };

    EntryDraft {
        created_at: Some(created_at),
        topic: field_text(obj, "topic"),
        concept: field_text(obj, "concept"),
        why_missed,
        why_notes: field_text(obj, "whyNotes"),
        rule: field_text(obj, "rule"),
        tags,
    }
    .build(id, now)
    .ok()
}

fn coerce_hydrate(record: &Value, now: DateTime<Utc>) -> Option<MissEntry> {
    let obj = record.as_object()?;

    let id = obj.get("id")?.as_str().filter(|id| !id.is_empty())?;
    let created_at = parse_timestamp(obj.get("createdAt")?.as_str()?)?;
    let topic = obj.get("topic")?.as_str()?;
    let concept = obj.get("concept")?.as_str()?;
    let why_missed = obj.get("whyMissed")?.as_str()?;
    let rule = obj.get("rule")?.as_str()?;
    let tags = obj.get("tags")?.as_array()?;

    EntryDraft {
        created_at: Some(created_at),
        topic: topic.to_string(),
        concept: concept.to_string(),
        why_missed: WhyMissed::from_label(why_missed).unwrap_or(WhyMissed::Other),
        why_notes: obj
            .get("whyNotes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        rule: rule.to_string(),
        tags: tags.iter().map(stringify).collect(),
    }
    .build(EntryId::from(id), now)
    .ok()
}

fn field_text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(stringify).unwrap_or_default()
}

/// Scalar JSON values rendered as text; null and containers become empty.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::format_timestamp;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-01-15T08:00:00.000Z").unwrap()
    }

    #[test]
    fn parse_array_rejects_non_arrays() {
        let err = parse_array(r#"{"entries": []}"#).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray("an object")));
        assert!(matches!(
            parse_array("not json").unwrap_err(),
            ImportError::Parse(_)
        ));
        assert!(parse_array("[]").unwrap().is_empty());
    }

    #[test]
    fn import_fills_defaults() {
        let records = vec![json!({
            "topic": " Renal ",
            "concept": "Type IV RTA",
            "rule": "think hypoaldosteronism",
            "whyMissed": "bored",
            "tags": ["Renal", " ", 42]
        })];
        let coerced = coerce_records(&records, CoercionMode::Import, now());
        assert_eq!(coerced.dropped, 0);
        let entry = &coerced.entries[0];
        assert!(!entry.id.as_str().is_empty());
        assert_eq!(entry.created_at, now());
        assert_eq!(entry.topic, "Renal");
        assert_eq!(entry.why_missed, WhyMissed::Other);
        assert_eq!(entry.tags, vec!["renal", "42"]);
    }

    #[test]
    fn import_keeps_ids_and_timestamps() {
        let records = vec![json!({
            "id": "abc",
            "createdAt": "2024-03-05T00:00:00.000Z",
            "topic": "Cardio",
            "concept": "Murmurs",
            "rule": "listen",
            "whyMissed": "time pressure",
            "whyNotes": "  ran out of time ",
            "tags": "not-an-array"
        })];
        let entry = coerce_records(&records, CoercionMode::Import, now())
            .entries
            .remove(0);
        assert_eq!(entry.id.as_str(), "abc");
        assert_eq!(format_timestamp(&entry.created_at), "2024-03-05T00:00:00.000Z");
        assert_eq!(entry.why_missed, WhyMissed::TimePressure);
        assert_eq!(entry.why_notes.as_deref(), Some("ran out of time"));
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn import_drops_incomplete_records() {
        let records = vec![
            json!({"topic": "Renal", "concept": "", "rule": "x"}),
            json!({"topic": "Renal", "concept": "RTA"}),
            json!({"topic": "Renal", "concept": "RTA", "rule": "x"}),
        ];
        assert!(require_records(&records).is_ok());
        let coerced = coerce_records(&records, CoercionMode::Import, now());
        assert_eq!(coerced.entries.len(), 1);
        assert_eq!(coerced.dropped, 2);
    }

    #[test]
    fn require_records_rejects_non_objects() {
        let records = vec![json!({"topic": "Renal"}), json!(17), json!(null)];
        let err = require_records(&records).unwrap_err();
        assert!(matches!(
            err,
            ImportError::NotARecord {
                index: 1,
                kind: "a number"
            }
        ));
        assert!(matches!(
            require_records(&[json!(null)]).unwrap_err(),
            ImportError::NotARecord { index: 0, kind: "null" }
        ));
        assert!(require_records(&[]).is_ok());
    }

    #[test]
    fn hydrate_requires_structural_fields() {
        let valid = json!({
            "id": "a",
            "createdAt": "2024-03-05T00:00:00.000Z",
            "topic": "Renal",
            "concept": "RTA",
            "whyMissed": "misread",
            "rule": "x",
            "tags": ["Renal"]
        });
        let mut missing_tags = valid.clone();
        missing_tags.as_object_mut().unwrap().remove("tags");
        let mut numeric_topic = valid.clone();
        numeric_topic["topic"] = json!(5);
        let mut bad_date = valid.clone();
        bad_date["createdAt"] = json!("someday");

        let records = vec![valid, missing_tags, numeric_topic, bad_date];
        let coerced = coerce_records(&records, CoercionMode::Hydrate, now());
        assert_eq!(coerced.entries.len(), 1);
        assert_eq!(coerced.dropped, 3);
        assert_eq!(coerced.entries[0].tags, vec!["renal"]);
        assert_eq!(coerced.entries[0].why_missed, WhyMissed::Misread);
    }

    #[test]
    fn hydrate_maps_unknown_reason_to_other() {
        let records = vec![json!({
            "id": "a",
            "createdAt": "2024-03-05T00:00:00.000Z",
            "topic": "Renal",
            "concept": "RTA",
            "whyMissed": "gremlins",
            "rule": "x",
            "tags": []
        })];
        let coerced = coerce_records(&records, CoercionMode::Hydrate, now());
        assert_eq!(coerced.entries[0].why_missed, WhyMissed::Other);
    }

    #[test]
    fn export_file_name_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 9).unwrap();
        assert_eq!(export_file_name(date), "miss-log-2025-02-09.json");
    }
}
