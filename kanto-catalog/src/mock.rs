//! In-memory catalog source for tests.
//!
//! Deterministic, instrumentable stand-in for the remote catalog: every
//! accessor has an invocation counter, failures can be injected, and an
//! optional artificial latency keeps lookups in flight long enough for
//! deduplication tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use kanto_core::{
    EntryId, Pokemon, PokemonSpecies, ResourcePage, ResourceRef, SourceError, SourceResult,
    StatInfo, TypeInfo,
};

use crate::source::CatalogSource;

/// Address a mock pokemon is registered under.
pub fn pokemon_url(id: EntryId) -> String {
    format!("https://catalog.example/pokemon/{id}/")
}

/// Invocation counts per accessor, taken at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub get_by_id: usize,
    pub get_pokemon_by_url: usize,
    pub get_species: usize,
    pub get_type: usize,
    pub get_stat: usize,
    pub list_page: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.get_by_id
            + self.get_pokemon_by_url
            + self.get_species
            + self.get_type
            + self.get_stat
            + self.list_page
    }
}

#[derive(Default)]
struct Counters {
    get_by_id: AtomicUsize,
    get_pokemon_by_url: AtomicUsize,
    get_species: AtomicUsize,
    get_type: AtomicUsize,
    get_stat: AtomicUsize,
    list_page: AtomicUsize,
}

/// Mock catalog source backed by in-memory maps.
#[derive(Default)]
pub struct MockCatalogSource {
    pokemon_by_id: HashMap<EntryId, Pokemon>,
    species: HashMap<String, PokemonSpecies>,
    types: HashMap<String, TypeInfo>,
    stats: HashMap<String, StatInfo>,
    latency: Option<Duration>,
    failure: Mutex<Option<SourceError>>,
    counters: Counters,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog entry, reachable both by id and by its mock
    /// address.
    pub fn insert_pokemon(&mut self, pokemon: Pokemon) {
        self.pokemon_by_id.insert(pokemon.id, pokemon);
    }

    /// Register species metadata under an address.
    pub fn insert_species(&mut self, url: impl Into<String>, species: PokemonSpecies) {
        self.species.insert(url.into(), species);
    }

    /// Register an elemental type under an address.
    pub fn insert_type(&mut self, url: impl Into<String>, type_info: TypeInfo) {
        self.types.insert(url.into(), type_info);
    }

    /// Register a stat definition under an address.
    pub fn insert_stat(&mut self, url: impl Into<String>, stat: StatInfo) {
        self.stats.insert(url.into(), stat);
    }

    /// Delay every accessor by `latency`, keeping lookups observably in
    /// flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// While set, every accessor fails with a clone of `error`.
    pub fn set_failure(&self, error: Option<SourceError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// Current invocation counts.
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            get_by_id: self.counters.get_by_id.load(Ordering::SeqCst),
            get_pokemon_by_url: self.counters.get_pokemon_by_url.load(Ordering::SeqCst),
            get_species: self.counters.get_species.load(Ordering::SeqCst),
            get_type: self.counters.get_type.load(Ordering::SeqCst),
            get_stat: self.counters.get_stat.load(Ordering::SeqCst),
            list_page: self.counters.list_page.load(Ordering::SeqCst),
        }
    }

    async fn gate(&self) -> SourceResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let failure = self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn get_by_id(&self, id: EntryId) -> SourceResult<Pokemon> {
        self.counters.get_by_id.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.pokemon_by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::not_found(format!("pokemon/{id}")))
    }

    async fn get_pokemon_by_url(&self, url: &str) -> SourceResult<Pokemon> {
        self.counters.get_pokemon_by_url.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.pokemon_by_id
            .values()
            .find(|p| pokemon_url(p.id) == url)
            .cloned()
            .ok_or_else(|| SourceError::not_found(url))
    }

    async fn get_species(&self, url: &str) -> SourceResult<PokemonSpecies> {
        self.counters.get_species.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.species
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::not_found(url))
    }

    async fn get_type(&self, url: &str) -> SourceResult<TypeInfo> {
        self.counters.get_type.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.types
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::not_found(url))
    }

    async fn get_stat(&self, url: &str) -> SourceResult<StatInfo> {
        self.counters.get_stat.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.stats
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::not_found(url))
    }

    async fn list_page(&self, offset: u32, limit: u32) -> SourceResult<ResourcePage> {
        self.counters.list_page.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        let mut ids: Vec<EntryId> = self.pokemon_by_id.keys().copied().collect();
        ids.sort_unstable();

        let results: Vec<ResourceRef> = ids
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|&id| {
                let pokemon = &self.pokemon_by_id[&id];
                ResourceRef {
                    name: pokemon.name.clone(),
                    url: pokemon_url(id),
                }
            })
            .collect();

        Ok(ResourcePage {
            count: ids.len() as u32,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_pokemon(id: EntryId, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            height: 7,
            weight: 69,
            sprite: None,
            species: ResourceRef {
                name: name.to_string(),
                url: format!("https://catalog.example/species/{id}/"),
            },
            types: vec![],
            stats: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_by_id_counts_and_misses() {
        let mut source = MockCatalogSource::new();
        source.insert_pokemon(minimal_pokemon(1, "bulbasaur"));

        let found = source.get_by_id(1).await.expect("registered");
        assert_eq!(found.name, "bulbasaur");

        let missing = source.get_by_id(999).await;
        assert_eq!(missing, Err(SourceError::not_found("pokemon/999")));
        assert_eq!(source.calls().get_by_id, 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mut source = MockCatalogSource::new();
        source.insert_pokemon(minimal_pokemon(1, "bulbasaur"));
        source.set_failure(Some(SourceError::transport("cable unplugged")));

        let result = source.get_by_id(1).await;
        assert_eq!(result, Err(SourceError::transport("cable unplugged")));

        source.set_failure(None);
        assert!(source.get_by_id(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_page_orders_and_bounds() {
        let mut source = MockCatalogSource::new();
        for id in [3, 1, 2, 7] {
            source.insert_pokemon(minimal_pokemon(id, &format!("mon-{id}")));
        }

        let page = source.list_page(1, 2).await.expect("no failure set");
        assert_eq!(page.count, 4);
        let ids: Vec<String> = page.results.iter().map(|r| r.url.clone()).collect();
        assert_eq!(ids, vec![pokemon_url(2), pokemon_url(3)]);
    }
}
