//! Catalog entity structures
//!
//! Shapes mirror what the remote catalog returns, trimmed to the fields the
//! browser actually reads. All entities are immutable once resolved; the
//! cache hands out clones, never references.

use serde::{Deserialize, Serialize};

use crate::EntryId;

/// Reference to a related resource by address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// One elemental type slot on a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_ref: ResourceRef,
}

/// One base-stat slot on a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSlot {
    pub base_stat: i32,
    pub stat: ResourceRef,
}

/// A full catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: EntryId,
    pub name: String,
    /// Height in decimetres, as the catalog reports it.
    pub height: i32,
    /// Weight in hectograms, as the catalog reports it.
    pub weight: i32,
    pub sprite: Option<String>,
    pub species: ResourceRef,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatSlot>,
}

/// A name in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub language: String,
    pub name: String,
}

/// Find a name for the given language tag in a localized name list,
/// falling back to the raw `name` field when the language is missing.
fn pick_localized<'a>(names: &'a [LocalizedName], fallback: &'a str, lang: &str) -> &'a str {
    names
        .iter()
        .find(|n| n.language == lang)
        .map(|n| n.name.as_str())
        .unwrap_or(fallback)
}

/// Species metadata for a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub id: EntryId,
    pub name: String,
    pub names: Vec<LocalizedName>,
}

impl PokemonSpecies {
    /// The species display name for the given language tag.
    pub fn localized_name(&self, lang: &str) -> &str {
        pick_localized(&self.names, &self.name, lang)
    }
}

/// An elemental type, with localized display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub id: EntryId,
    pub name: String,
    pub names: Vec<LocalizedName>,
}

impl TypeInfo {
    pub fn localized_name(&self, lang: &str) -> &str {
        pick_localized(&self.names, &self.name, lang)
    }
}

/// A base stat, with localized display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatInfo {
    pub id: EntryId,
    pub name: String,
    pub names: Vec<LocalizedName>,
}

impl StatInfo {
    pub fn localized_name(&self, lang: &str) -> &str {
        pick_localized(&self.names, &self.name, lang)
    }
}

/// One page of lightweight references from the catalog's listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub count: u32,
    pub results: Vec<ResourceRef>,
}

/// The fully resolved bundle displayed for one team slot: the entry plus
/// its species, types, and stats, fetched together so a slot renders in
/// one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub pokemon: Pokemon,
    pub species: PokemonSpecies,
    pub types: Vec<TypeInfo>,
    pub stats: Vec<StatInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species_with_names() -> PokemonSpecies {
        PokemonSpecies {
            id: 1,
            name: "bulbasaur".to_string(),
            names: vec![
                LocalizedName {
                    language: "fr".to_string(),
                    name: "Bulbizarre".to_string(),
                },
                LocalizedName {
                    language: "en".to_string(),
                    name: "Bulbasaur".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_localized_name_picks_requested_language() {
        let species = species_with_names();
        assert_eq!(species.localized_name("fr"), "Bulbizarre");
        assert_eq!(species.localized_name("en"), "Bulbasaur");
    }

    #[test]
    fn test_localized_name_falls_back_to_slug() {
        let species = species_with_names();
        assert_eq!(species.localized_name("ko"), "bulbasaur");
    }

    #[test]
    fn test_type_slot_deserializes_renamed_field() {
        let slot: TypeSlot = serde_json::from_value(serde_json::json!({
            "slot": 1,
            "type": { "name": "grass", "url": "https://catalog.example/type/12/" }
        }))
        .expect("valid type slot");
        assert_eq!(slot.type_ref.name, "grass");
    }
}
