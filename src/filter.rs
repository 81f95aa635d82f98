//! Free-text filtering of show and episode collections

use crate::config::MarkupPolicy;
use crate::format::strip_html;
use crate::models::{EntityKind, Episode, Show};

/// Case-insensitive substring check, allocation-free for ASCII input
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    if haystack.is_ascii() && needle.is_ascii() {
        if needle.len() > haystack.len() {
            return false;
        }
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()));
    }

    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn summary_matches(summary: Option<&str>, query: &str, markup: MarkupPolicy) -> bool {
    match (summary, markup) {
        (None, _) => false,
        (Some(s), MarkupPolicy::Literal) => contains_ignore_case(s, query),
        (Some(s), MarkupPolicy::Stripped) => contains_ignore_case(&strip_html(s), query),
    }
}

/// An entity with a fixed set of searchable text fields
pub trait Searchable {
    const KIND: EntityKind;

    fn matches(&self, query: &str, markup: MarkupPolicy) -> bool;
}

impl Searchable for Show {
    const KIND: EntityKind = EntityKind::Shows;

    fn matches(&self, query: &str, markup: MarkupPolicy) -> bool {
        contains_ignore_case(&self.name, query)
            || summary_matches(self.summary.as_deref(), query, markup)
            || self.genres.iter().any(|g| contains_ignore_case(g, query))
    }
}

impl Searchable for Episode {
    const KIND: EntityKind = EntityKind::Episodes;

    fn matches(&self, query: &str, markup: MarkupPolicy) -> bool {
        contains_ignore_case(&self.name, query)
            || summary_matches(self.summary.as_deref(), query, markup)
    }
}

/// Indices into `base` of every item matching `query`, in base order.
///
/// Always evaluated against the full base collection.
pub fn filter_indices<T: Searchable>(base: &[T], query: &str, markup: MarkupPolicy) -> Vec<usize> {
    if query.is_empty() {
        return (0..base.len()).collect();
    }
    base.iter()
        .enumerate()
        .filter(|(_, item)| item.matches(query, markup))
        .map(|(i, _)| i)
        .collect()
}

pub fn count_label(matched: usize, total: usize, kind: EntityKind) -> String {
    format!("Displaying {} / {} {}", matched, total, kind.label())
}
