//! Query/selection state for the collection currently in view
//!
//! The free-text query and the dropdown selection are mutually resetting:
//! setting one clears the other, so the visible set is always derived from
//! exactly one of them applied to the full base collection.

use crate::config::MarkupPolicy;
use crate::filter::{count_label, filter_indices, Searchable};

/// Items to paint, as indices into the base collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visible {
    pub indices: Vec<usize>,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Browse {
    query: String,
    selection: Option<usize>,
}

impl Browse {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Whether the "show all" affordance applies
    pub fn can_show_all(&self) -> bool {
        self.selection.is_some()
    }

    /// Replace the query; abandons any single-item selection
    pub fn set_query(&mut self, query: String) {
        self.selection = None;
        self.query = query;
    }

    /// Apply a dropdown choice. Keys outside `0..len` count as "none".
    pub fn select(&mut self, key: Option<usize>, len: usize) {
        self.query.clear();
        self.selection = key.filter(|&i| i < len);
    }

    /// Back to the full base collection with no query and no selection
    pub fn show_all(&mut self) {
        self.reset();
    }

    /// Called whenever the base collection changes
    pub fn reset(&mut self) {
        self.query.clear();
        self.selection = None;
    }

    pub fn visible<T: Searchable>(&self, base: &[T], markup: MarkupPolicy) -> Visible {
        let total = base.len();

        let indices = match self.selection {
            Some(i) if i < total => vec![i],
            _ => filter_indices(base, &self.query, markup),
        };

        let label = count_label(indices.len(), total, T::KIND);
        Visible { indices, label }
    }
}
