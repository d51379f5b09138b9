//! Application settings

use std::path::PathBuf;
use serde::{Serialize, Deserialize};

use crate::navigation::{Identifier, IdentifierSpace, MAX_ID, MIN_ID};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Lowest valid entry id
    pub min_id: i64,

    /// Highest valid entry id
    pub max_id: i64,

    /// Entries requested per list page
    pub page_size: usize,

    /// Language used to pick the description text
    pub preferred_language: String,

    /// Move names shown on the detail card
    pub moves_shown: usize,

    /// Records kept per cache
    pub cache_capacity: usize,

    /// Artwork URL for list cards, `{id}` is replaced by the entry id
    pub artwork_url_template: Option<String>,

    /// Root of a JSON catalog, takes precedence over `api_base_url`
    pub data_dir: Option<PathBuf>,

    /// Base URL of the remote catalog API, e.g. `https://pokeapi.co/api/v2`
    ///
    /// The built-in demo catalog is used when neither this nor `data_dir` is set.
    pub api_base_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            min_id: MIN_ID,
            max_id: MAX_ID,
            page_size: 21,
            preferred_language: "en".to_string(),
            moves_shown: 2,
            cache_capacity: 256,
            artwork_url_template: Some(
                "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{id}.png"
                    .to_string(),
            ),
            data_dir: None,
            api_base_url: None,
        }
    }
}

impl AppSettings {
    /// The configured id range, `None` when `min_id > max_id`
    pub fn id_space(&self) -> Option<IdentifierSpace> {
        IdentifierSpace::new(self.min_id, self.max_id)
    }

    /// Artwork URL for an entry, if a template is configured
    pub fn artwork_url(&self, id: Identifier) -> Option<String> {
        self.artwork_url_template
            .as_ref()
            .map(|template| template.replace("{id}", &id.to_string()))
    }
}
