//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the name search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How long the raw input must be stable before a resolution fires.
    pub debounce: Duration,
    /// Maximum number of fuzzy matches resolved per search.
    pub search_limit: usize,
    /// Size of the default browsing page shown for empty input.
    pub page_size: usize,
    /// The single language tag the fuzzy index matches against.
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            search_limit: 5,
            page_size: 7,
            language: "fr".to_string(),
        }
    }
}

impl SearchConfig {
    /// Create a new search config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the per-search match limit.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Set the default browsing page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the designated match language.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = lang.into();
        self
    }
}
