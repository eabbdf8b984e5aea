//! Static localized-name dataset
//!
//! The fuzzy index is built from a fixed, versioned collection of name
//! records loaded wholesale at startup. Records are immutable for the
//! process lifetime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::EntryId;

/// One entry of the static name dataset: an id plus its name in every
/// language the catalog publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: EntryId,
    /// Language tag -> localized name. BTreeMap keeps serialization
    /// order-stable.
    pub names: BTreeMap<String, String>,
}

impl NameRecord {
    /// The record's name in the given language, if published.
    pub fn name(&self, lang: &str) -> Option<&str> {
        self.names.get(lang).map(String::as_str)
    }
}

/// A single fuzzy-search result.
///
/// Lower scores are better; 0.0 is an exact match. Results are ordered by
/// ascending score with ties broken by original dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub id: EntryId,
    pub score: f64,
    pub rank: usize,
}

/// Parse the name dataset from its JSON form.
///
/// The dataset ships as a JSON array of records; an empty dataset is
/// rejected because an index built from it could never return a match.
pub fn load_name_records(json: &str) -> Result<Vec<NameRecord>, DatasetError> {
    let records: Vec<NameRecord> = serde_json::from_str(json)?;
    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}
