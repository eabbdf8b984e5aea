//! KANTO Test Utilities
//!
//! Centralized test infrastructure for the workspace:
//! - A small deterministic catalog fixture (six entries with species,
//!   types, and stats, French and English names)
//! - The embedded name dataset matching that fixture
//! - Entity builders for one-off test data
//!
//! The mock source itself lives in `kanto-catalog` so that crate's own
//! tests can use it; it is re-exported here for everyone else.

// Re-export the mock source from its home crate
pub use kanto_catalog::mock::{pokemon_url, CallCounts};
pub use kanto_catalog::MockCatalogSource;

use kanto_core::{
    load_name_records, EntryId, LocalizedName, NameRecord, Pokemon, PokemonSpecies, ResourceRef,
    StatInfo, StatSlot, TypeInfo, TypeSlot,
};

/// JSON name dataset covering the fixture catalog, in the shape the real
/// dataset ships in.
pub const FIXTURE_DATASET: &str = r#"[
    { "id": 1,  "names": { "en": "Bulbasaur",  "fr": "Bulbizarre" } },
    { "id": 2,  "names": { "en": "Ivysaur",    "fr": "Herbizarre" } },
    { "id": 3,  "names": { "en": "Venusaur",   "fr": "Florizarre" } },
    { "id": 4,  "names": { "en": "Charmander", "fr": "Salameche" } },
    { "id": 7,  "names": { "en": "Squirtle",   "fr": "Carapuce" } },
    { "id": 25, "names": { "en": "Pikachu",    "fr": "Pikachu" } }
]"#;

/// The fixture name records, parsed from [`FIXTURE_DATASET`].
pub fn fixture_records() -> Vec<NameRecord> {
    load_name_records(FIXTURE_DATASET).expect("fixture dataset is valid")
}

pub fn species_url(id: EntryId) -> String {
    format!("https://catalog.example/species/{id}/")
}

pub fn type_url(id: EntryId) -> String {
    format!("https://catalog.example/type/{id}/")
}

pub fn stat_url(id: EntryId) -> String {
    format!("https://catalog.example/stat/{id}/")
}

/// Build a catalog entry with the given types, referencing the fixture's
/// hp and speed stats.
pub fn make_pokemon(id: EntryId, name: &str, type_ids: &[(EntryId, &str)]) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        height: 7,
        weight: 69,
        sprite: Some(format!("https://catalog.example/sprites/{id}.png")),
        species: ResourceRef {
            name: name.to_string(),
            url: species_url(id),
        },
        types: type_ids
            .iter()
            .enumerate()
            .map(|(i, &(type_id, type_name))| TypeSlot {
                slot: (i + 1) as u8,
                type_ref: ResourceRef {
                    name: type_name.to_string(),
                    url: type_url(type_id),
                },
            })
            .collect(),
        stats: vec![
            StatSlot {
                base_stat: 45,
                stat: ResourceRef {
                    name: "hp".to_string(),
                    url: stat_url(1),
                },
            },
            StatSlot {
                base_stat: 45,
                stat: ResourceRef {
                    name: "speed".to_string(),
                    url: stat_url(6),
                },
            },
        ],
    }
}

/// Build species metadata with French and English display names.
pub fn make_species(id: EntryId, slug: &str, fr: &str, en: &str) -> PokemonSpecies {
    PokemonSpecies {
        id,
        name: slug.to_string(),
        names: vec![
            LocalizedName {
                language: "fr".to_string(),
                name: fr.to_string(),
            },
            LocalizedName {
                language: "en".to_string(),
                name: en.to_string(),
            },
        ],
    }
}

fn make_type(id: EntryId, slug: &str, fr: &str) -> TypeInfo {
    TypeInfo {
        id,
        name: slug.to_string(),
        names: vec![LocalizedName {
            language: "fr".to_string(),
            name: fr.to_string(),
        }],
    }
}

fn make_stat(id: EntryId, slug: &str, fr: &str) -> StatInfo {
    StatInfo {
        id,
        name: slug.to_string(),
        names: vec![LocalizedName {
            language: "fr".to_string(),
            name: fr.to_string(),
        }],
    }
}

/// A populated mock catalog: entries 1, 2, 3, 4, 7 and 25 with their
/// species, types, and stats, matching [`FIXTURE_DATASET`].
pub fn fixture_source() -> MockCatalogSource {
    let mut source = MockCatalogSource::new();

    let seed: &[(EntryId, &str, &str, &str, &[(EntryId, &str)])] = &[
        (1, "bulbasaur", "Bulbizarre", "Bulbasaur", &[(12, "grass"), (4, "poison")]),
        (2, "ivysaur", "Herbizarre", "Ivysaur", &[(12, "grass"), (4, "poison")]),
        (3, "venusaur", "Florizarre", "Venusaur", &[(12, "grass"), (4, "poison")]),
        (4, "charmander", "Salameche", "Charmander", &[(10, "fire")]),
        (7, "squirtle", "Carapuce", "Squirtle", &[(11, "water")]),
        (25, "pikachu", "Pikachu", "Pikachu", &[(13, "electric")]),
    ];

    for &(id, slug, fr, en, types) in seed {
        source.insert_pokemon(make_pokemon(id, slug, types));
        source.insert_species(species_url(id), make_species(id, slug, fr, en));
    }

    for (id, slug, fr) in [
        (12, "grass", "Plante"),
        (4, "poison", "Poison"),
        (10, "fire", "Feu"),
        (11, "water", "Eau"),
        (13, "electric", "Electrik"),
    ] {
        source.insert_type(type_url(id), make_type(id, slug, fr));
    }

    for (id, slug, fr) in [(1, "hp", "PV"), (6, "speed", "Vitesse")] {
        source.insert_stat(stat_url(id), make_stat(id, slug, fr));
    }

    source
}
