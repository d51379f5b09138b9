use std::sync::Arc;
use ahash::AHashMap;
use async_trait::async_trait;
use dex_core::{
    Cursor, DescriptionRecord, DetailRecord, DexSource, EntrySummary, FetchError, Identifier, Page,
};

use super::paginate;

/// In-memory catalog
///
/// Backs the built-in demo catalog and tests. Entries without a detail or
/// description record report `NotFound` for that request.
pub struct MemorySource {
    name: String,
    entries: Vec<EntrySummary>,
    details: AHashMap<Identifier, Arc<DetailRecord>>,
    descriptions: AHashMap<Identifier, Arc<DescriptionRecord>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            details: AHashMap::new(),
            descriptions: AHashMap::new(),
        }
    }

    /// Add a list entry; the list stays ordered by id
    pub fn with_entry(mut self, entry: EntrySummary) -> Self {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            let at = self.entries.partition_point(|e| e.id < entry.id);
            self.entries.insert(at, entry);
        }
        self
    }

    /// Add a detail record (and its list entry)
    pub fn with_detail(mut self, record: DetailRecord) -> Self {
        let entry = EntrySummary {
            id: record.id,
            name: record.name.clone(),
        };
        self.details.insert(record.id, Arc::new(record));
        self.with_entry(entry)
    }

    pub fn with_description(mut self, record: DescriptionRecord) -> Self {
        self.descriptions.insert(record.id, Arc::new(record));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DexSource for MemorySource {
    async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError> {
        self.details.get(&id).cloned().ok_or(FetchError::NotFound(id))
    }

    async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError> {
        self.descriptions.get(&id).cloned().ok_or(FetchError::NotFound(id))
    }

    async fn page(&self, cursor: Option<Cursor>, limit: usize) -> Result<Page, FetchError> {
        Ok(paginate(&self.entries, cursor, limit))
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
