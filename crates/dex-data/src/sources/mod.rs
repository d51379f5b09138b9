pub mod http_source;
pub mod json_source;
pub mod memory_source;

pub use http_source::HttpSource;
pub use json_source::JsonDirSource;
pub use memory_source::MemorySource;

use dex_core::{Cursor, EntrySummary, Page};

/// Slice one page out of a fully known entry list
pub(crate) fn paginate(entries: &[EntrySummary], cursor: Option<Cursor>, limit: usize) -> Page {
    let start = cursor.map(|c| c.0).unwrap_or(0).min(entries.len());
    let end = start.saturating_add(limit.max(1)).min(entries.len());

    Page {
        entries: entries[start..end].to_vec(),
        next_cursor: (end < entries.len()).then_some(Cursor(end)),
    }
}
