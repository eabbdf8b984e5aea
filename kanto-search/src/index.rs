//! Fuzzy name index.
//!
//! Built once from the static name dataset, matching against one
//! designated language only. Scoring is Jaro-Winkler based: 0.0 is an
//! exact match, 1.0 no similarity, and anything past the similarity
//! threshold is excluded rather than returned with a bad score. The
//! Winkler prefix boost is what makes partial inputs like "bulba" land on
//! "Bulbasaur" well ahead of near-miss unrelated names.

use kanto_core::{EntryId, NameRecord, RankedMatch};

/// Worst admissible score. Matches scoring above this have no meaningful
/// overlap with the query and are dropped entirely. Jaro-Winkler keeps
/// stray single-character coincidences near 0.55 distance, so the cutoff
/// sits below that band.
const MATCH_THRESHOLD: f64 = 0.4;

struct IndexedName {
    id: EntryId,
    folded: String,
}

/// Read-only fuzzy index over the designated-language names.
pub struct NameIndex {
    language: String,
    entries: Vec<IndexedName>,
}

impl NameIndex {
    /// Index each record's name in `language`. Records that do not publish
    /// a name in that language are skipped; dataset order is preserved and
    /// is the tie-break order for equal scores.
    pub fn build(records: &[NameRecord], language: &str) -> Self {
        let entries = records
            .iter()
            .filter_map(|record| {
                record.name(language).map(|name| IndexedName {
                    id: record.id,
                    folded: name.to_lowercase(),
                })
            })
            .collect();
        Self {
            language: language.to_string(),
            entries,
        }
    }

    /// The language tag this index matches against.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank indexed names against `query`, best first, truncated to
    /// `limit`.
    ///
    /// Pure and synchronous. An empty or whitespace-only query returns no
    /// matches, never the whole dataset.
    pub fn search(&self, query: &str, limit: usize) -> Vec<RankedMatch> {
        let folded_query = query.trim().to_lowercase();
        if folded_query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, EntryId)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = score(&folded_query, &entry.folded);
                (score <= MATCH_THRESHOLD).then_some((score, entry.id))
            })
            .collect();

        // Stable sort keeps dataset order on ties.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(limit);

        scored
            .into_iter()
            .enumerate()
            .map(|(rank, (score, id))| RankedMatch { id, score, rank })
            .collect()
    }
}

/// Distance between a folded query and a folded name: 0.0 exact, 1.0 no
/// similarity. Deterministic and monotonic in character overlap.
fn score(query: &str, name: &str) -> f64 {
    if query == name {
        return 0.0;
    }
    1.0 - strsim::jaro_winkler(query, name)
}

// =============================================================================
// TESTS
// =============================================================================
