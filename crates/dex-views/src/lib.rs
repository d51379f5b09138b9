//! View models for the catalog browser
//!
//! Everything here is toolkit independent: the shell feeds host events in,
//! reads display models out and applies the pager commands it is given.

pub mod cue;
pub mod detail_view;
pub mod list_browser;
pub mod presentation;
pub mod session;
pub mod slot;

pub use cue::CuePlayer;
pub use detail_view::{ApplyOutcome, DetailViewModel};
pub use list_browser::{ListBrowser, PageFeed, PageRequest, SortKey};
pub use presentation::{DetailPresentation, StatLine};
pub use session::PagerSession;
pub use slot::{
    CompletionPayload, FetchCompletion, FetchContext, SettledSections, SlotBinding, SlotData,
};
