//! Slot bindings and fetch completions

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use dex_core::{
    DescriptionRecord, DetailRecord, DexSource, FetchError, Identifier, IdentifierSpace, SlotIndex,
};

/// Load state of one section of a slot
#[derive(Debug, Clone)]
pub enum SlotData<T> {
    /// Slot has never been bound
    Unbound,
    Loading,
    Ready(Arc<T>),
    Failed(FetchError),
    /// Bound to an id outside the catalog range; never fetched
    OutOfRange,
}

impl<T> SlotData<T> {
    pub fn ready(&self) -> Option<&Arc<T>> {
        match self {
            SlotData::Ready(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SlotData::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SlotData::Failed(_))
    }

    /// The request for this section has finished, one way or the other
    pub fn is_settled(&self) -> bool {
        matches!(self, SlotData::Ready(_) | SlotData::Failed(_))
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SlotData::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What a slot is bound to, and which binding a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    pub slot: SlotIndex,
    pub id: Identifier,
    /// Per-slot counter, bumped on every rebind
    pub generation: u64,
}

/// Finished sections of a binding, handed to the slot that takes its id over
#[derive(Debug, Clone)]
pub struct SettledSections {
    pub id: Identifier,
    pub detail: Option<SlotData<DetailRecord>>,
    pub description: Option<SlotData<DescriptionRecord>>,
}

/// Result carried by a completion
#[derive(Debug)]
pub enum CompletionPayload {
    Detail(Result<Arc<DetailRecord>, FetchError>),
    Description(Result<Arc<DescriptionRecord>, FetchError>),
}

impl CompletionPayload {
    pub fn resource(&self) -> &'static str {
        match self {
            CompletionPayload::Detail(_) => "detail",
            CompletionPayload::Description(_) => "description",
        }
    }
}

/// A finished request, tagged with the binding it was issued for
#[derive(Debug)]
pub struct FetchCompletion {
    pub binding: SlotBinding,
    pub payload: CompletionPayload,
}

pub type CompletionSender = mpsc::UnboundedSender<FetchCompletion>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<FetchCompletion>;

/// Everything a slot needs to issue requests
#[derive(Clone)]
pub struct FetchContext {
    pub source: Arc<dyn DexSource>,
    pub runtime: Handle,
    pub completions: CompletionSender,
    pub space: IdentifierSpace,
}

impl FetchContext {
    /// Create a context plus the receiver its completions arrive on
    pub fn new(
        source: Arc<dyn DexSource>,
        runtime: Handle,
        space: IdentifierSpace,
    ) -> (Self, CompletionReceiver) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (
            Self {
                source,
                runtime,
                completions,
                space,
            },
            receiver,
        )
    }
}
