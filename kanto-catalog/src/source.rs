//! The remote catalog boundary.

use async_trait::async_trait;

use kanto_core::{EntryId, Pokemon, PokemonSpecies, ResourcePage, SourceResult, StatInfo, TypeInfo};

/// Opaque asynchronous accessor for the remote catalog.
///
/// Every operation may fail with [`kanto_core::SourceError::NotFound`] (the
/// id or address has no corresponding resource) or
/// [`kanto_core::SourceError::Transport`] (the catalog is unreachable or
/// returned malformed data). The resource cache is the only component that
/// catches these failures; no retry happens at this layer.
///
/// The by-address accessors are typed per resource kind because each kind
/// deserializes to a different shape; together they cover the catalog's
/// generic fetch-by-url endpoint.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch a full catalog entry by id.
    async fn get_by_id(&self, id: EntryId) -> SourceResult<Pokemon>;

    /// Fetch a full catalog entry by address (used when resolving the
    /// lightweight references a listing page returns).
    async fn get_pokemon_by_url(&self, url: &str) -> SourceResult<Pokemon>;

    /// Fetch species metadata by address.
    async fn get_species(&self, url: &str) -> SourceResult<PokemonSpecies>;

    /// Fetch an elemental type by address.
    async fn get_type(&self, url: &str) -> SourceResult<TypeInfo>;

    /// Fetch a stat definition by address.
    async fn get_stat(&self, url: &str) -> SourceResult<StatInfo>;

    /// Fetch one page of lightweight entry references.
    async fn list_page(&self, offset: u32, limit: u32) -> SourceResult<ResourcePage>;
}
