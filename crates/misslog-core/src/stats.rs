//! Derived views over the entry collection: distinct topics and tags,
//! weak-tag ranking, and the per-reason breakdown.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{MissEntry, WhyMissed};

/// Number of weak tags shown when no limit is given.
pub const DEFAULT_WEAK_TAG_LIMIT: usize = 10;

/// A tag and how many entries carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// A reason and how many entries were missed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub why_missed: WhyMissed,
    pub count: usize,
}

/// Locale-like ordering: case-insensitive first; on a case-only tie the
/// lowercase form sorts first.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    let mut out: Vec<String> = set.into_iter().map(str::to_string).collect();
    out.sort_by(|a, b| collate(a, b));
    out
}

/// Distinct non-empty topics, collated ascending.
pub fn topics_in_use(entries: &[MissEntry]) -> Vec<String> {
    sorted_distinct(entries.iter().map(|e| e.topic.trim()))
}

/// Distinct tags across all entries, collated ascending.
pub fn tags_in_use(entries: &[MissEntry]) -> Vec<String> {
    sorted_distinct(entries.iter().flat_map(|e| e.tags.iter().map(String::as_str)))
}

/// Rank tags by the number of entries carrying them.
///
/// A tag repeated inside one entry counts once for that entry. Ties are
/// broken by `collate` ascending.
pub fn weak_tag_ranking(entries: &[MissEntry], limit: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let distinct: BTreeSet<&str> = entry.tags.iter().map(String::as_str).collect();
        for tag in distinct {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| collate(&a.tag, &b.tag)));
    ranked.truncate(limit);
    ranked
}

/// Entries per reason, in `WhyMissed::ALL` order, zero counts omitted.
pub fn why_missed_breakdown(entries: &[MissEntry]) -> Vec<ReasonCount> {
    WhyMissed::ALL
        .into_iter()
        .map(|why| ReasonCount {
            why_missed: why,
            count: entries.iter().filter(|e| e.why_missed == why).count(),
        })
        .filter(|r| r.count > 0)
        .collect()
}
