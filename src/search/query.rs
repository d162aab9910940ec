//! Search queries and the local match predicate.

use crate::error::SearchError;
use crate::models::{Record, ResourceKind};

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    needle: String,
    kind: ResourceKind,
}

impl Query {
    /// Build a query. Blank text is rejected before anything is sent.
    pub fn new(text: &str, kind: ResourceKind) -> Result<Self, SearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        Ok(Self {
            text: text.to_string(),
            needle: text.to_lowercase(),
            kind,
        })
    }

    /// The trimmed text as typed, sent upstream as the server-side filter.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether `record` matches: any of its search fields contains the
    /// query, ignoring case. Records of another kind never match.
    pub fn matches(&self, record: &Record) -> bool {
        record.kind() == self.kind
            && record
                .search_fields()
                .into_iter()
                .any(|field| contains_needle(field, &self.needle))
    }
}

/// Case-insensitive substring test; a missing field never matches.
fn contains_needle(field: Option<&str>, needle: &str) -> bool {
    match field {
        Some(text) => !needle.is_empty() && text.to_lowercase().contains(needle),
        None => false,
    }
}
