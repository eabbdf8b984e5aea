//! KANTO Core - Catalog Data Types
//!
//! Pure data structures shared by every other crate in the workspace:
//! catalog entities, localized name records, the tri-state snapshot
//! contract, the bounded team roster, and error types. No I/O and no
//! async code lives here.

use chrono::{DateTime, Utc};

pub mod config;
pub mod entities;
pub mod error;
pub mod names;
pub mod roster;
pub mod snapshot;

pub use config::SearchConfig;
pub use entities::{
    LocalizedName, Pokemon, PokemonSpecies, ResourcePage, ResourceRef, StatInfo, StatSlot,
    TeamMember, TypeInfo, TypeSlot,
};
pub use error::{DatasetError, KantoError, KantoResult, SourceError, SourceResult};
pub use names::{load_name_records, NameRecord, RankedMatch};
pub use roster::{Roster, TEAM_CAPACITY};
pub use snapshot::Snapshot;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Catalog entry identifier (the fixed numeric id assigned by the remote
/// catalog; ids are dense, small, and never reused).
pub type EntryId = u32;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
