//! KANTO Session - Owned Browser State
//!
//! One [`Session`] per browsing session: it owns the cache instances, the
//! fuzzy index, the search pipeline, and the roster, and it is the only
//! thing allowed to mutate the roster. Nothing here is global; dropping
//! the session is the only cache eviction there is.
//!
//! Per-resource caches are split by value type, so the same address can
//! safely appear in the types cache and the stats cache without key
//! collision.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::debug;

use kanto_catalog::{CacheKey, CatalogSource, ResourceCache};
use kanto_core::{
    EntryId, NameRecord, Pokemon, PokemonSpecies, Roster, SearchConfig, Snapshot, StatInfo,
    TeamMember, TypeInfo, TEAM_CAPACITY,
};
use kanto_search::{NameIndex, SearchPipeline};

/// The three independent detail lookups backing an opened entry: species
/// metadata, elemental types, and stat definitions. Each settles on its
/// own; the consumer renders whatever has arrived.
#[derive(Debug, Clone)]
pub struct EntryDetails {
    pub species: Snapshot<PokemonSpecies>,
    pub types: Snapshot<Vec<TypeInfo>>,
    pub stats: Snapshot<Vec<StatInfo>>,
}

/// Owned per-session state for the catalog browser.
pub struct Session {
    source: Arc<dyn CatalogSource>,
    pipeline: SearchPipeline,
    team_cache: ResourceCache<TeamMember>,
    species_cache: ResourceCache<PokemonSpecies>,
    types_cache: ResourceCache<Vec<TypeInfo>>,
    stats_cache: ResourceCache<Vec<StatInfo>>,
    roster: Roster,
}

impl Session {
    /// Build a session over a catalog source and the static name dataset.
    pub fn new(
        source: Arc<dyn CatalogSource>,
        records: &[NameRecord],
        config: SearchConfig,
    ) -> Self {
        let index = NameIndex::build(records, &config.language);
        let pipeline = SearchPipeline::new(index, Arc::clone(&source), config);
        Self {
            source,
            pipeline,
            team_cache: ResourceCache::new(),
            species_cache: ResourceCache::new(),
            types_cache: ResourceCache::new(),
            stats_cache: ResourceCache::new(),
            roster: Roster::new(),
        }
    }

    // ------------------------------------------------------------------
    // Browsing and search
    // ------------------------------------------------------------------

    /// The default first-page listing.
    pub fn browse(&self) -> Snapshot<Vec<Pokemon>> {
        self.pipeline.browse()
    }

    /// Push a raw search input change; resolution fires once the input has
    /// been stable for the debounce window.
    pub fn set_search_input(&self, text: &str) {
        self.pipeline.set_input(text);
    }

    /// Wait for the next debounce-stable input and start resolving it.
    pub async fn next_search_results(&mut self) -> Option<Snapshot<Vec<Pokemon>>> {
        self.pipeline.next_resolution().await
    }

    pub fn pipeline(&self) -> &SearchPipeline {
        &self.pipeline
    }

    // ------------------------------------------------------------------
    // Entry details
    // ------------------------------------------------------------------

    /// Resolve the detail lookups for an opened entry. Each lookup is
    /// keyed by the addresses it fetches, so two entries sharing a type
    /// share its cache entry too.
    pub fn entry_details(&self, pokemon: &Pokemon) -> EntryDetails {
        let species = {
            let url = pokemon.species.url.clone();
            let source = Arc::clone(&self.source);
            self.species_cache
                .request(CacheKey::Resource(url.clone()), move || async move {
                    source.get_species(&url).await
                })
        };

        let types = {
            let urls: Vec<String> = pokemon
                .types
                .iter()
                .map(|slot| slot.type_ref.url.clone())
                .collect();
            let source = Arc::clone(&self.source);
            self.types_cache
                .request(CacheKey::ResourceSet(urls.clone()), move || async move {
                    try_join_all(urls.iter().map(|url| source.get_type(url))).await
                })
        };

        let stats = {
            let urls: Vec<String> = pokemon
                .stats
                .iter()
                .map(|slot| slot.stat.url.clone())
                .collect();
            let source = Arc::clone(&self.source);
            self.stats_cache
                .request(CacheKey::ResourceSet(urls.clone()), move || async move {
                    try_join_all(urls.iter().map(|url| source.get_stat(url))).await
                })
        };

        EntryDetails {
            species,
            types,
            stats,
        }
    }

    // ------------------------------------------------------------------
    // Team
    // ------------------------------------------------------------------

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Add an entry to the team. No-op on duplicates and on a full roster.
    /// A successful add immediately starts the member's bundle lookup.
    pub fn add_to_team(&mut self, id: EntryId) -> bool {
        if !self.roster.add(id) {
            return false;
        }
        debug!(id, "added to team");
        self.request_member(id);
        true
    }

    /// Remove an entry from the team. The member's cached bundle stays
    /// cached; re-adding the same id later is served without a refetch.
    pub fn remove_from_team(&mut self, id: EntryId) -> bool {
        let removed = self.roster.remove(id);
        if removed {
            debug!(id, "removed from team");
        }
        removed
    }

    /// Fixed-arity view of the team: one slot per capacity position,
    /// `None` for empty slots. Occupied slots resolve independently, keyed
    /// per member id, so changing one member never refetches the others.
    pub fn team_view(&self) -> Vec<Option<Snapshot<TeamMember>>> {
        (0..TEAM_CAPACITY)
            .map(|slot| self.roster.get(slot).map(|id| self.request_member(id)))
            .collect()
    }

    /// The cache holding per-member team bundles.
    pub fn team_cache(&self) -> &ResourceCache<TeamMember> {
        &self.team_cache
    }

    pub fn species_cache(&self) -> &ResourceCache<PokemonSpecies> {
        &self.species_cache
    }

    pub fn types_cache(&self) -> &ResourceCache<Vec<TypeInfo>> {
        &self.types_cache
    }

    pub fn stats_cache(&self) -> &ResourceCache<Vec<StatInfo>> {
        &self.stats_cache
    }

    fn request_member(&self, id: EntryId) -> Snapshot<TeamMember> {
        let source = Arc::clone(&self.source);
        self.team_cache
            .request(CacheKey::Team(id), move || async move {
                let pokemon = source.get_by_id(id).await?;
                let species = source.get_species(&pokemon.species.url).await?;
                let types = try_join_all(
                    pokemon
                        .types
                        .iter()
                        .map(|slot| source.get_type(&slot.type_ref.url)),
                )
                .await?;
                let stats = try_join_all(
                    pokemon
                        .stats
                        .iter()
                        .map(|slot| source.get_stat(&slot.stat.url)),
                )
                .await?;
                Ok(TeamMember {
                    pokemon,
                    species,
                    types,
                    stats,
                })
            })
    }
}
