//! KANTO Search - Name Resolution
//!
//! Turns free text into resolved catalog entries in three stages:
//! debounce the raw input, rank candidate ids with the fuzzy
//! [`NameIndex`], then resolve the ids through the deduplicating resource
//! cache. The index is synchronous and immutable after construction; only
//! the resolution step touches the network.

pub mod debounce;
pub mod index;
pub mod pipeline;

pub use debounce::Debouncer;
pub use index::NameIndex;
pub use pipeline::SearchPipeline;
