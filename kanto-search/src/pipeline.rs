//! The name search pipeline.
//!
//! Composition order is fixed: raw input -> debounce -> fuzzy index
//! (synchronous) -> resource cache (asynchronous, deduplicated) -> resolved
//! entries. Every cache lookup is keyed by the input string itself, so a
//! superseded resolution can only populate an entry no newer input ever
//! reads; no cancellation is needed and none is performed.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use kanto_catalog::{CacheKey, CatalogSource, ResourceCache};
use kanto_core::{EntryId, Pokemon, SearchConfig, Snapshot};

use crate::debounce::Debouncer;
use crate::index::NameIndex;

/// Debounced free-text resolution over the catalog.
pub struct SearchPipeline {
    index: NameIndex,
    source: Arc<dyn CatalogSource>,
    cache: ResourceCache<Vec<Pokemon>>,
    config: SearchConfig,
    input_tx: watch::Sender<String>,
    debouncer: Debouncer,
}

impl SearchPipeline {
    pub fn new(index: NameIndex, source: Arc<dyn CatalogSource>, config: SearchConfig) -> Self {
        let (input_tx, input_rx) = watch::channel(String::new());
        let debouncer = Debouncer::new(input_rx, config.debounce);
        Self {
            index,
            source,
            cache: ResourceCache::new(),
            config,
            input_tx,
            debouncer,
        }
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The cache holding search and page resolutions.
    pub fn cache(&self) -> &ResourceCache<Vec<Pokemon>> {
        &self.cache
    }

    /// Push a raw input change. Unchanged text is not re-published, so it
    /// does not restart the debounce window.
    pub fn set_input(&self, text: &str) {
        self.input_tx.send_if_modified(|current| {
            if current == text {
                false
            } else {
                text.clone_into(current);
                true
            }
        });
    }

    /// Wait for the next debounce-stable input and start resolving it.
    /// Returns `None` when the pipeline's input side has been torn down.
    pub async fn next_resolution(&mut self) -> Option<Snapshot<Vec<Pokemon>>> {
        let input = self.debouncer.next_stable().await?;
        Some(self.resolve(&input))
    }

    /// Resolve `input` immediately (debounce already applied by the
    /// caller). Returns the current snapshot; Pending on first sight of
    /// this input.
    ///
    /// Empty input resolves the default browsing page rather than an empty
    /// result.
    pub fn resolve(&self, input: &str) -> Snapshot<Vec<Pokemon>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return self.browse();
        }

        let matches = self
            .index
            .search(trimmed, self.config.search_limit);
        let ids: Vec<EntryId> = matches.iter().map(|m| m.id).collect();
        debug!(input = %trimmed, matched = ids.len(), "resolving search input");

        let key = CacheKey::Search {
            query: trimmed.to_string(),
            ids: ids.clone(),
        };
        let source = Arc::clone(&self.source);
        self.cache.request(key, move || async move {
            let mut entries = Vec::with_capacity(ids.len());
            for id in ids {
                entries.push(source.get_by_id(id).await?);
            }
            Ok(entries)
        })
    }

    /// Resolve the default first-page listing shown for empty input.
    pub fn browse(&self) -> Snapshot<Vec<Pokemon>> {
        let limit = self.config.page_size as u32;
        let key = CacheKey::Page { offset: 0, limit };
        let source = Arc::clone(&self.source);
        self.cache.request(key, move || async move {
            let page = source.list_page(0, limit).await?;
            let mut entries = Vec::with_capacity(page.results.len());
            for item in page.results {
                entries.push(source.get_pokemon_by_url(&item.url).await?);
            }
            Ok(entries)
        })
    }

    /// Like [`resolve`](Self::resolve), but wait for the lookup to settle.
    pub async fn resolve_settled(&self, input: &str) -> Snapshot<Vec<Pokemon>> {
        let snapshot = self.resolve(input);
        if !snapshot.is_loading {
            return snapshot;
        }
        self.cache
            .wait(&self.key_for(input))
            .await
            .unwrap_or(snapshot)
    }

    /// Number of placeholder slots the consumer should render while the
    /// current resolution is Pending. Fixed per mode so a pending list
    /// never changes length.
    pub fn placeholder_slots(&self, input: &str) -> usize {
        if input.trim().is_empty() {
            self.config.page_size
        } else {
            self.config.search_limit
        }
    }

    fn key_for(&self, input: &str) -> CacheKey {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            CacheKey::Page {
                offset: 0,
                limit: self.config.page_size as u32,
            }
        } else {
            let ids = self
                .index
                .search(trimmed, self.config.search_limit)
                .into_iter()
                .map(|m| m.id)
                .collect();
            CacheKey::Search {
                query: trimmed.to_string(),
                ids,
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kanto_test_utils::{fixture_records, fixture_source, MockCatalogSource};
    use std::time::Duration;

    fn fixture_index() -> NameIndex {
        NameIndex::build(&fixture_records(), "fr")
    }

    fn pipeline_with_source() -> (SearchPipeline, Arc<MockCatalogSource>) {
        let source = Arc::new(fixture_source());
        let config = SearchConfig::default();
        let pipeline = SearchPipeline::new(
            fixture_index(),
            source.clone() as Arc<dyn CatalogSource>,
            config,
        );
        (pipeline, source)
    }

    fn pipeline() -> SearchPipeline {
        pipeline_with_source().0
    }

    #[tokio::test]
    async fn test_search_resolves_matched_entries() {
        let pipeline = pipeline();

        let first = pipeline.resolve("bulbi");
        assert!(first.is_loading);

        let settled = pipeline.resolve_settled("bulbi").await;
        let entries = settled.data.expect("resolved");
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].name, "bulbasaur");
    }

    #[tokio::test]
    async fn test_empty_input_resolves_default_page() {
        let pipeline = pipeline();

        let settled = pipeline.resolve_settled("").await;
        let entries = settled.data.expect("resolved");
        // First-page browsing mode, never an empty search result. The
        // fixture catalog holds six entries, fewer than the page size.
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].id, 1);
    }

    #[tokio::test]
    async fn test_repeated_input_reuses_cache_entry() {
        let (pipeline, source) = pipeline_with_source();

        pipeline.resolve_settled("pika").await;
        let calls_after_first = source.calls().total();

        pipeline.resolve_settled("pika").await;
        assert_eq!(source.calls().total(), calls_after_first);
    }

    #[tokio::test]
    async fn test_distinct_inputs_use_distinct_keys() {
        let pipeline = pipeline();

        pipeline.resolve_settled("pika").await;
        pipeline.resolve_settled("bulbi").await;

        let stats = pipeline.cache().stats();
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_stale_input_never_overwrites_newer_result() {
        let pipeline = pipeline();

        // Old input still in flight when the new one resolves.
        let stale = pipeline.resolve("bulbi");
        assert!(stale.is_loading);
        let newer = pipeline.resolve_settled("pika").await;
        assert_eq!(newer.data.as_ref().expect("resolved")[0].id, 25);

        // The stale input settled into its own entry and the newer one is
        // untouched.
        let newer_again = pipeline.resolve_settled("pika").await;
        assert_eq!(newer_again.data.expect("resolved")[0].id, 25);
    }

    #[tokio::test]
    async fn test_unmatched_input_resolves_empty() {
        let pipeline = pipeline();
        let settled = pipeline.resolve_settled("zzzzzz").await;
        assert_eq!(settled.data, Some(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_input_resolves_once_for_final_value() {
        let mut pipeline = pipeline();

        let input_feed = {
            let tx = pipeline.input_tx.clone();
            tokio::spawn(async move {
                for text in ["b", "bu", "bul", "bulb"] {
                    tx.send(text.to_string()).expect("pipeline alive");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            })
        };

        let snapshot = pipeline
            .next_resolution()
            .await
            .expect("input side alive");
        assert!(snapshot.is_loading);
        input_feed.await.expect("feeder completes");

        // Exactly one resolution was started, for "bulb" only.
        let stats = pipeline.cache().stats();
        assert_eq!(stats.misses, 1);
        assert!(pipeline.cache().contains(&pipeline.key_for("bulb")));
        assert!(!pipeline.cache().contains(&pipeline.key_for("bul")));
    }

    #[test]
    fn test_placeholder_slots_are_fixed_per_mode() {
        let source = Arc::new(fixture_source());
        let pipeline =
            SearchPipeline::new(fixture_index(), source, SearchConfig::default());

        assert_eq!(pipeline.placeholder_slots(""), 7);
        assert_eq!(pipeline.placeholder_slots("pika"), 5);
        assert_eq!(pipeline.placeholder_slots("zz"), 5);
    }
}
