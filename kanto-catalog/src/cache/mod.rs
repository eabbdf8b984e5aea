//! Deduplicating resource cache.
//!
//! Generalizes "run this asynchronous accessor, keyed by a derived cache
//! key, and share the in-flight or settled result across all callers
//! requesting the same key". Keys are always explicit enum variants
//! ([`CacheKey`]), never derived from call-site identity; an accessor that
//! closes over varying data gets a key carrying that data.

mod key;
mod store;

pub use key::CacheKey;
pub use store::{CacheStats, EntryMeta, ResourceCache};
