//! Explicit cache keys.
//!
//! A key is the full identity of a logical asynchronous request: the
//! accessor's role plus every input that determines its result. Two
//! requests with equal keys are the same request; the cache will run the
//! accessor for at most one of them.

use std::fmt;

use kanto_core::EntryId;

/// Deterministic identity for a logical catalog lookup.
///
/// Each variant names a role; the payload carries the inputs. The `Display`
/// rendering is order-stable and used only for logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A full entry fetched by id.
    Entry(EntryId),
    /// A related resource fetched by address.
    Resource(String),
    /// Several related resources fetched together, in order.
    ResourceSet(Vec<String>),
    /// One listing page.
    Page { offset: u32, limit: u32 },
    /// A team slot's bundle for one member id. Keyed per member so that
    /// changing one slot never refetches the other five.
    Team(EntryId),
    /// A search resolution: the raw input plus the matched ids. Keyed by
    /// the input string itself so a stale resolution can only ever populate
    /// an entry nobody reads.
    Search { query: String, ids: Vec<EntryId> },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(id) => write!(f, "entry:{id}"),
            Self::Resource(url) => write!(f, "resource:{url}"),
            Self::ResourceSet(urls) => {
                write!(f, "resource-set:")?;
                for (i, url) in urls.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{url}")?;
                }
                Ok(())
            }
            Self::Page { offset, limit } => write!(f, "page:{offset}+{limit}"),
            Self::Team(id) => write!(f, "team:{id}"),
            Self::Search { query, ids } => {
                write!(f, "search:{query:?}:")?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_inputs_equal_keys() {
        let a = CacheKey::Search {
            query: "bulba".to_string(),
            ids: vec![1, 2],
        };
        let b = CacheKey::Search {
            query: "bulba".to_string(),
            ids: vec![1, 2],
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_inputs_differ() {
        let a = CacheKey::Search {
            query: "bulba".to_string(),
            ids: vec![1, 2],
        };
        let b = CacheKey::Search {
            query: "bulb".to_string(),
            ids: vec![1, 2],
        };
        assert_ne!(a, b);

        // Same payload under a different role is a different request.
        assert_ne!(CacheKey::Entry(1), CacheKey::Team(1));
    }

    #[test]
    fn test_display_is_order_stable() {
        let key = CacheKey::ResourceSet(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(key.to_string(), "resource-set:a,b");

        let swapped = CacheKey::ResourceSet(vec!["b".to_string(), "a".to_string()]);
        assert_ne!(key.to_string(), swapped.to_string());
    }
}
