//! KANTO Catalog - Remote Data Access
//!
//! Two pieces live here:
//!
//! - [`CatalogSource`], the async boundary to the remote catalog. Transport
//!   and wire schema are somebody else's problem; everything behind this
//!   trait may be slow or fail.
//! - [`ResourceCache`], a generic per-key cache that runs an accessor at
//!   most once per [`CacheKey`] and shares the in-flight or settled result
//!   with every caller, concurrent or later.
//!
//! [`MockCatalogSource`] lives here rather than in `kanto-test-utils` so the
//! cache's own tests can use it without a dependency cycle; the test-utils
//! crate re-exports it.

pub mod cache;
pub mod mock;
pub mod source;

pub use cache::{CacheKey, CacheStats, EntryMeta, ResourceCache};
pub use mock::MockCatalogSource;
pub use source::CatalogSource;
