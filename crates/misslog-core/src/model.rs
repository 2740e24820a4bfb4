//! Core data model types for misslog.
//!
//! These are the fundamental types that the whole system uses to represent
//! logged misses and the user input that creates or edits them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque identifier of a miss entry.
///
/// Freshly created entries get a UUID v4; imported entries keep whatever
/// string id they carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Why a question was missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WhyMissed {
    #[default]
    #[serde(rename = "knowledge gap")]
    KnowledgeGap,
    #[serde(rename = "misread")]
    Misread,
    #[serde(rename = "changed answer")]
    ChangedAnswer,
    #[serde(rename = "time pressure")]
    TimePressure,
    #[serde(rename = "calculation")]
    Calculation,
    #[serde(rename = "other")]
    Other,
}

impl WhyMissed {
    /// All reasons, in display order.
    pub const ALL: [WhyMissed; 6] = [
        WhyMissed::KnowledgeGap,
        WhyMissed::Misread,
        WhyMissed::ChangedAnswer,
        WhyMissed::TimePressure,
        WhyMissed::Calculation,
        WhyMissed::Other,
    ];

    /// The wire label, e.g. `"knowledge gap"`.
    pub fn label(self) -> &'static str {
        match self {
            WhyMissed::KnowledgeGap => "knowledge gap",
            WhyMissed::Misread => "misread",
            WhyMissed::ChangedAnswer => "changed answer",
            WhyMissed::TimePressure => "time pressure",
            WhyMissed::Calculation => "calculation",
            WhyMissed::Other => "other",
        }
    }

    /// Exact match against the wire label only.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|why| why.label() == label)
    }
}

impl fmt::Display for WhyMissed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WhyMissed {
    type Err = String;

    /// Lenient parse for user input: case-insensitive, and `-`/`_` may
    /// stand in for the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::from_label(&normalized).ok_or_else(|| {
            let expected: Vec<&str> = Self::ALL.iter().map(|w| w.label()).collect();
            format!(
                "unknown reason: {} (expected one of: {})",
                s.trim(),
                expected.join(", ")
            )
        })
    }
}

/// One logged missed question and its learning note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissEntry {
    pub id: EntryId,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub concept: String,
    #[serde(default)]
    pub why_missed: WhyMissed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_notes: Option<String>,
    pub rule: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MissEntry {
    /// Text searched by free-text filtering: topic, concept, rule and tags.
    pub fn search_blob(&self) -> String {
        [
            self.topic.as_str(),
            self.concept.as_str(),
            self.rule.as_str(),
            self.tags.join(" ").as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Unvalidated field values for creating or replacing an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    /// Timestamp to record; `None` means "now".
    pub created_at: Option<DateTime<Utc>>,
    pub topic: String,
    pub concept: String,
    pub why_missed: WhyMissed,
    pub why_notes: String,
    pub rule: String,
    /// Raw tag values; normalized on build.
    pub tags: Vec<String>,
}

impl EntryDraft {
    /// Start a draft from an existing entry so an edit can override a
    /// subset of fields.
    pub fn from_entry(entry: &MissEntry) -> Self {
        Self {
            created_at: Some(entry.created_at),
            topic: entry.topic.clone(),
            concept: entry.concept.clone(),
            why_missed: entry.why_missed,
            why_notes: entry.why_notes.clone().unwrap_or_default(),
            rule: entry.rule.clone(),
            tags: entry.tags.clone(),
        }
    }

    /// Replace the tag list with comma-separated text.
    pub fn with_tags_text(mut self, tags_text: &str) -> Self {
        self.tags = parse_tags(tags_text);
        self
    }

    /// Validate and build the entry under `id`. The timestamp is truncated
    /// to the millisecond precision the snapshot stores.
    pub fn build(self, id: EntryId, now: DateTime<Utc>) -> Result<MissEntry, ValidationError> {
        let topic = required("topic", &self.topic)?;
        let concept = required("concept", &self.concept)?;
        let rule = required("rule", &self.rule)?;
        let why_notes = Some(self.why_notes.trim().to_string()).filter(|n| !n.is_empty());

        Ok(MissEntry {
            id,
            created_at: self.created_at.unwrap_or(now).trunc_subsecs(3),
            topic,
            concept,
            why_missed: self.why_missed,
            why_notes,
            rule,
            tags: normalize_tags(&self.tags),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Normalize one tag: trimmed and lowercased, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalize a tag list, keeping order and duplicates.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter().filter_map(|t| normalize_tag(t.as_ref())).collect()
}

/// Split comma-separated tag text into normalized tags.
pub fn parse_tags(tags_text: &str) -> Vec<String> {
    tags_text.split(',').filter_map(normalize_tag).collect()
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {e} (expected YYYY-MM-DD)", value.trim()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a stored timestamp: RFC 3339, or a bare date as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_date(value).ok())
}

/// Render a timestamp the way the snapshot stores it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `createdAt` as RFC 3339 with millisecond precision.
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EntryDraft {
        EntryDraft {
            created_at: Some(parse_date("2024-03-05").unwrap()),
            topic: "  Renal ".into(),
            concept: "Type IV RTA".into(),
            why_missed: WhyMissed::Misread,
            why_notes: "   ".into(),
            rule: "Hyperkalemia + NAGMA = hypoaldosteronism".into(),
            tags: vec![],
        }
        .with_tags_text("Renal, , ACID-base ,raas,renal")
    }

    #[test]
    fn why_missed_display_and_parse() {
        assert_eq!(WhyMissed::KnowledgeGap.to_string(), "knowledge gap");
        assert_eq!(
            "time-pressure".parse::<WhyMissed>().unwrap(),
            WhyMissed::TimePressure
        );
        assert_eq!(
            "Changed_Answer".parse::<WhyMissed>().unwrap(),
            WhyMissed::ChangedAnswer
        );
        assert!("laziness".parse::<WhyMissed>().is_err());
        assert_eq!(WhyMissed::default(), WhyMissed::KnowledgeGap);
        assert_eq!(WhyMissed::from_label("Misread"), None);
    }

    #[test]
    fn parse_tags_splits_trims_and_lowercases() {
        assert_eq!(
            parse_tags("Renal, , ACID-base ,raas,renal"),
            vec!["renal", "acid-base", "raas", "renal"]
        );
        assert!(parse_tags("  ,  ").is_empty());
    }

    #[test]
    fn build_trims_and_normalizes() {
        let entry = draft().build(EntryId::from("e1"), Utc::now()).unwrap();
        assert_eq!(entry.topic, "Renal");
        assert_eq!(entry.why_notes, None);
        assert_eq!(entry.tags, vec!["renal", "acid-base", "raas", "renal"]);
        assert_eq!(format_timestamp(&entry.created_at), "2024-03-05T00:00:00.000Z");
    }

    #[test]
    fn build_rejects_blank_required_fields() {
        let mut d = draft();
        d.concept = "   ".into();
        let err = d.build(EntryId::generate(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("concept"));
    }

    #[test]
    fn build_defaults_timestamp_to_now_at_millisecond_precision() {
        let now = parse_timestamp("2024-03-05T12:30:00.250Z").unwrap()
            + chrono::Duration::nanoseconds(123_456);
        let mut d = draft();
        d.created_at = None;
        let entry = d.build(EntryId::generate(), now).unwrap();
        assert_eq!(format_timestamp(&entry.created_at), "2024-03-05T12:30:00.250Z");

        let decoded: MissEntry =
            serde_json::from_value(serde_json::to_value(&entry).unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn entry_serializes_with_camel_case_wire_fields() {
        let entry = draft().build(EntryId::from("e1"), Utc::now()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "e1");
        assert_eq!(json["createdAt"], "2024-03-05T00:00:00.000Z");
        assert_eq!(json["whyMissed"], "misread");
        assert!(json.get("whyNotes").is_none());

        let decoded: MissEntry = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_bare_dates() {
        let a = parse_timestamp("2024-03-05T12:30:00.250Z").unwrap();
        assert_eq!(format_timestamp(&a), "2024-03-05T12:30:00.250Z");
        let b = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(format_timestamp(&b), "2024-03-05T00:00:00.000Z");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn search_blob_covers_topic_concept_rule_and_tags() {
        let entry = draft().build(EntryId::generate(), Utc::now()).unwrap();
        let blob = entry.search_blob();
        assert!(blob.contains("renal"));
        assert!(blob.contains("type iv rta"));
        assert!(blob.contains("hypoaldosteronism"));
        assert!(blob.contains("acid-base raas"));
    }
}
