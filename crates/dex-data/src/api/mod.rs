//! Remote API wire format
//!
//! Payload shapes as served by the remote catalog (and mirrored on disk by
//! [`crate::sources::JsonDirSource`]), plus their conversion into the records
//! the rest of the application works with. Every field the views can live
//! without is optional here so that a sparse payload still converts.

use serde::Deserialize;
use dex_core::{BaseStat, DescriptionRecord, DetailRecord, EntrySummary, Identifier};

/// `{ name, url }` reference used throughout the API
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Entry list payload
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResourceList {
    #[serde(default)]
    pub count: Option<usize>,
    /// URL of the following page, absent on the last one
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub entry: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cries {
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub legacy: Option<String>,
}

/// Detail payload (`/pokemon/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub sprites: Option<Sprites>,
    #[serde(default)]
    pub cries: Option<Cries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

/// Species payload (`/pokemon-species/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesPayload {
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

impl From<PokemonPayload> for DetailRecord {
    fn from(payload: PokemonPayload) -> Self {
        let artwork_uri = payload.sprites.and_then(|sprites| {
            sprites
                .other
                .and_then(|other| other.official_artwork)
                .and_then(|artwork| artwork.front_default)
                .or(sprites.front_default)
        });
        let cry_uri = payload.cries.and_then(|cries| cries.latest.or(cries.legacy));

        DetailRecord {
            id: Identifier::new(payload.id),
            name: payload.name,
            types: payload.types.into_iter().map(|slot| slot.kind.name).collect(),
            height: payload.height,
            weight: payload.weight,
            moves: payload.moves.into_iter().map(|slot| slot.entry.name).collect(),
            stats: payload
                .stats
                .into_iter()
                .map(|slot| BaseStat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            artwork_uri,
            cry_uri,
        }
    }
}

impl SpeciesPayload {
    /// First flavor text in `language`, cleaned up for display
    pub fn description(&self, id: Identifier, language: &str) -> DescriptionRecord {
        let text = self
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == language)
            .map(|entry| clean_flavor_text(&entry.flavor_text));

        DescriptionRecord {
            id,
            language: language.to_string(),
            text,
        }
    }
}

/// Flavor texts carry hard line breaks and form feeds from the games
pub fn clean_flavor_text(raw: &str) -> String {
    raw.replace('\n', ". ").replace('\u{c}', " ")
}

/// Entry id from a resource URL such as `.../pokemon/25/`
pub fn entry_id_from_url(url: &str) -> Option<Identifier> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<i64>().ok())
        .map(Identifier::new)
}

impl NamedResourceList {
    /// List entries whose URL carries a parseable id
    pub fn entries(&self) -> Vec<EntrySummary> {
        self.results
            .iter()
            .filter_map(|resource| {
                entry_id_from_url(&resource.url).map(|id| EntrySummary {
                    id,
                    name: resource.name.clone(),
                })
            })
            .collect()
    }
}
