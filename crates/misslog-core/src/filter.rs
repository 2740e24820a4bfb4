//! Entry filtering.

use crate::model::{normalize_tag, MissEntry, WhyMissed};

/// Optional constraints combined with AND. Absent or blank values impose
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact topic match.
    pub topic: Option<String>,
    /// Tag membership; normalized to lowercase before matching.
    pub tag: Option<String>,
    /// Exact reason match.
    pub why_missed: Option<WhyMissed>,
    /// Case-insensitive substring over topic, concept, rule and tags.
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.compile().is_unconstrained()
    }

    fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            topic: self.topic.as_deref().filter(|t| !t.is_empty()),
            tag: self.tag.as_deref().and_then(normalize_tag),
            why_missed: self.why_missed,
            search: self
                .search
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}

struct CompiledFilter<'a> {
    topic: Option<&'a str>,
    tag: Option<String>,
    why_missed: Option<WhyMissed>,
    search: Option<String>,
}

impl CompiledFilter<'_> {
    fn is_unconstrained(&self) -> bool {
        self.topic.is_none()
            && self.tag.is_none()
            && self.why_missed.is_none()
            && self.search.is_none()
    }

    fn matches(&self, entry: &MissEntry) -> bool {
        let matches_topic = self.topic.map_or(true, |t| entry.topic == t);
        let matches_tag = self.tag.as_deref().map_or(true, |t| entry.has_tag(t));
        let matches_why = self.why_missed.map_or(true, |w| entry.why_missed == w);
        let matches_search = self
            .search
            .as_deref()
            .map_or(true, |q| entry.search_blob().contains(q));
        matches_topic && matches_tag && matches_why && matches_search
    }
}

/// Entries satisfying every supplied criterion, in input order.
pub fn filter_entries<'e>(
    entries: &'e [MissEntry],
    criteria: &FilterCriteria,
) -> Vec<&'e MissEntry> {
    let compiled = criteria.compile();
    entries.iter().filter(|e| compiled.matches(e)).collect()
}
