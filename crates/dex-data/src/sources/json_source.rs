use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use dex_core::{
    Cursor, DescriptionRecord, DetailRecord, DexSource, EntrySummary, FetchError, Identifier, Page,
};

use crate::api::{NamedResourceList, PokemonPayload, SpeciesPayload};
use crate::DataError;
use super::paginate;

/// Catalog stored as JSON files in the remote API's layout
///
/// ```text
/// <root>/pokemon/index.json          entry list
/// <root>/pokemon/<id>.json           detail payloads
/// <root>/pokemon-species/<id>.json   description payloads
/// ```
pub struct JsonDirSource {
    root: PathBuf,
    name: String,
    /// Language used to select description text
    language: String,
    /// Entry list, read once on first page request
    index: RwLock<Option<Arc<Vec<EntrySummary>>>>,
}

impl JsonDirSource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        info!("Using JSON catalog at {}", name);

        Self {
            root,
            name,
            language: language.into(),
            index: RwLock::new(None),
        }
    }

    fn detail_path(&self, id: Identifier) -> PathBuf {
        self.root.join("pokemon").join(format!("{}.json", id))
    }

    fn species_path(&self, id: Identifier) -> PathBuf {
        self.root.join("pokemon-species").join(format!("{}.json", id))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("pokemon").join("index.json")
    }

    async fn load_index(&self) -> Result<Arc<Vec<EntrySummary>>, DataError> {
        if let Some(index) = self.index.read().clone() {
            return Ok(index);
        }

        let list: NamedResourceList = read_json(&self.index_path()).await?;
        let entries = Arc::new(list.entries());
        debug!("Loaded {} list entries from {}", entries.len(), self.name);

        *self.index.write() = Some(entries.clone());
        Ok(entries)
    }
}

/// Read and parse one JSON file
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Missing files mean the catalog has no such entry
fn entry_error(id: Identifier, error: DataError) -> FetchError {
    match error {
        DataError::Io(e) if e.kind() == ErrorKind::NotFound => FetchError::NotFound(id),
        other => other.into(),
    }
}

#[async_trait]
impl DexSource for JsonDirSource {
    async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError> {
        let payload: PokemonPayload = read_json(&self.detail_path(id))
            .await
            .map_err(|e| entry_error(id, e))?;
        Ok(Arc::new(payload.into()))
    }

    async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError> {
        let payload: SpeciesPayload = read_json(&self.species_path(id))
            .await
            .map_err(|e| entry_error(id, e))?;
        Ok(Arc::new(payload.description(id, &self.language)))
    }

    async fn page(&self, cursor: Option<Cursor>, limit: usize) -> Result<Page, FetchError> {
        let index = self.load_index().await?;
        Ok(paginate(&index, cursor, limit))
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_catalog(root: &Path) {
        fs::create_dir_all(root.join("pokemon")).unwrap();
        fs::create_dir_all(root.join("pokemon-species")).unwrap();
        fs::write(
            root.join("pokemon").join("index.json"),
            r#"{ "count": 3, "results": [
                { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
                { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" },
                { "name": "venusaur", "url": "https://pokeapi.co/api/v2/pokemon/3/" }
            ] }"#,
        )
        .unwrap();
        fs::write(
            root.join("pokemon").join("2.json"),
            r#"{ "id": 2, "name": "ivysaur", "height": 10, "weight": 130,
                 "types": [ { "type": { "name": "grass" } } ] }"#,
        )
        .unwrap();
        fs::write(
            root.join("pokemon-species").join("2.json"),
            r#"{ "flavor_text_entries": [
                { "flavor_text": "When the bulb on\nits back grows large,", "language": { "name": "en" } }
            ] }"#,
        )
        .unwrap();
        fs::write(root.join("pokemon").join("3.json"), "{ not json").unwrap();
    }

    #[tokio::test]
    async fn test_reads_detail_and_description() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        let source = JsonDirSource::new(dir.path(), "en");

        let detail = source.detail(Identifier::new(2)).await.unwrap();
        assert_eq!(detail.name, "ivysaur");
        assert_eq!(detail.weight, Some(130));
        assert_eq!(detail.types, vec!["grass"]);

        let description = source.description(Identifier::new(2)).await.unwrap();
        assert_eq!(description.text.as_deref(), Some("When the bulb on. its back grows large,"));
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        let source = JsonDirSource::new(dir.path(), "en");

        assert_eq!(
            source.detail(Identifier::new(1)).await.unwrap_err(),
            FetchError::NotFound(Identifier::new(1))
        );
        assert!(matches!(
            source.detail(Identifier::new(3)).await.unwrap_err(),
            FetchError::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_pages_from_index() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        let source = JsonDirSource::new(dir.path(), "en");

        let first = source.page(None, 2).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        let second = source.page(first.next_cursor, 2).await.unwrap();
        assert_eq!(second.entries, vec![EntrySummary::new(3, "venusaur")]);
        assert!(second.next_cursor.is_none());
    }
}
