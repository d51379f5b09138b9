//! Core functionality for the catalog browser
//!
//! This crate provides the identifier arithmetic, the three-slot pager
//! navigation state machine, the record types shared by every layer and the
//! fetch collaborator trait.

pub mod error;
pub mod events;
pub mod navigation;
pub mod records;
pub mod settings;

// Re-export commonly used types
pub use error::FetchError;
pub use navigation::{
    Direction, GestureEvent, GestureReconciler, Identifier, IdentifierSpace,
    NavigationContext, PagerCommand, PagerWindow, ScrollState, SlotIndex, Transition,
    WindowState,
};
pub use records::{BaseStat, Cursor, DescriptionRecord, DetailRecord, EntrySummary, Page};
pub use settings::AppSettings;
pub use data::DexSource;

/// Fetch collaborator contract
pub mod data {
    use std::sync::Arc;
    use crate::error::FetchError;
    use crate::navigation::Identifier;
    use crate::records::{Cursor, DescriptionRecord, DetailRecord, Page};

    /// Trait for catalog sources
    ///
    /// Implementations own their records; callers only ever receive shared
    /// references.
    #[async_trait::async_trait]
    pub trait DexSource: Send + Sync {
        /// Get the detail record of one entry
        async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError>;

        /// Get the supplementary description of one entry
        async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError>;

        /// Get one page of the entry list, starting at `cursor` (the beginning when `None`)
        async fn page(&self, cursor: Option<Cursor>, limit: usize) -> Result<Page, FetchError>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
