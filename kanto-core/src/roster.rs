//! Bounded team roster
//!
//! An ordered, deduplicated, size-capped collection of entry identifiers.
//! The overflow policy is exact: `add` appends and then truncates the
//! proposed sequence to the first `TEAM_CAPACITY` elements. Because
//! additions always append at the end, a full roster simply drops the new
//! id; an existing member is never evicted to admit a new one.

use serde::{Deserialize, Serialize};

use crate::EntryId;

/// Maximum number of roster members.
pub const TEAM_CAPACITY: usize = 6;

/// The user's bounded, ordered selection of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: Vec<EntryId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id to the roster.
    ///
    /// No-op if the id is already present or the roster is full. Returns
    /// true when the roster changed.
    pub fn add(&mut self, id: EntryId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.push(id);
        self.members.truncate(TEAM_CAPACITY);
        self.members.contains(&id)
    }

    /// Remove every occurrence of an id (at most one, by the uniqueness
    /// invariant). No-op if absent. Returns true when the roster changed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }

    /// The id occupying the given slot, if any.
    pub fn get(&self, slot: usize) -> Option<EntryId> {
        self.members.get(slot).copied()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_CAPACITY
    }

    /// Members in insertion order.
    pub fn as_slice(&self) -> &[EntryId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.members.iter().copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
