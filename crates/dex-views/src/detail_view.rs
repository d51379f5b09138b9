//! Per-slot detail view model

use std::sync::Arc;
use tracing::{debug, trace, warn};
use dex_core::{DescriptionRecord, DetailRecord, Identifier, SlotIndex};

use crate::slot::{
    CompletionPayload, FetchCompletion, FetchContext, SettledSections, SlotBinding, SlotData,
};

/// Whether a completion was applied to the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The slot was rebound after the request was issued
    Stale,
}

/// Displayable data for one pager slot
///
/// Detail and description are requested independently; either may fail or
/// never arrive without affecting the other or the pager.
pub struct DetailViewModel {
    slot: SlotIndex,
    binding: Option<SlotBinding>,
    generation: u64,
    detail: SlotData<DetailRecord>,
    description: SlotData<DescriptionRecord>,
}

impl DetailViewModel {
    pub fn new(slot: SlotIndex) -> Self {
        Self {
            slot,
            binding: None,
            generation: 0,
            detail: SlotData::Unbound,
            description: SlotData::Unbound,
        }
    }

    /// Bind the slot to `id` and request its records
    ///
    /// Returns `false` if the slot is already bound to `id`.
    pub fn bind(&mut self, id: Identifier, ctx: &FetchContext) -> bool {
        self.rebind(id, ctx, None)
    }

    /// Bind the slot to `id`, taking over the sections `carried` already holds
    ///
    /// Only sections that are missing from `carried` are requested. A
    /// `carried` value for another id is ignored.
    pub fn rebind(&mut self, id: Identifier, ctx: &FetchContext, carried: Option<&SettledSections>) -> bool {
        if self.bound_id() == Some(id) {
            return false;
        }

        self.generation += 1;
        let binding = SlotBinding {
            slot: self.slot,
            id,
            generation: self.generation,
        };
        self.binding = Some(binding);

        if !ctx.space.is_valid(id) {
            trace!("Slot {:?} bound to {} outside the catalog range", self.slot, id);
            self.detail = SlotData::OutOfRange;
            self.description = SlotData::OutOfRange;
            return true;
        }

        let carried = carried.filter(|sections| sections.id == id);
        match carried.and_then(|sections| sections.detail.clone()) {
            Some(detail) => self.detail = detail,
            None => {
                self.detail = SlotData::Loading;
                issue_detail(binding, ctx);
            }
        }
        match carried.and_then(|sections| sections.description.clone()) {
            Some(description) => self.description = description,
            None => {
                self.description = SlotData::Loading;
                issue_description(binding, ctx);
            }
        }
        true
    }

    /// Finished sections of the current binding, if any
    pub fn settled(&self) -> Option<SettledSections> {
        let id = self.bound_id()?;
        let detail = self.detail.is_settled().then(|| self.detail.clone());
        let description = self.description.is_settled().then(|| self.description.clone());
        if detail.is_none() && description.is_none() {
            return None;
        }
        Some(SettledSections {
            id,
            detail,
            description,
        })
    }

    /// Apply a finished request, unless it belongs to an older binding
    pub fn apply(&mut self, completion: FetchCompletion) -> ApplyOutcome {
        if self.binding != Some(completion.binding) {
            debug!(
                "Discarding stale {} for {} on slot {:?} (generation {}, now {})",
                completion.payload.resource(),
                completion.binding.id,
                self.slot,
                completion.binding.generation,
                self.generation
            );
            return ApplyOutcome::Stale;
        }

        let id = completion.binding.id;
        match completion.payload {
            CompletionPayload::Detail(result) => {
                self.detail = into_slot_data(result, id, "detail");
            }
            CompletionPayload::Description(result) => {
                self.description = into_slot_data(result, id, "description");
            }
        }
        ApplyOutcome::Applied
    }

    /// Request the detail record again after a failure
    pub fn retry_detail(&mut self, ctx: &FetchContext) -> bool {
        match self.binding {
            Some(binding) if self.detail.is_failed() => {
                self.detail = SlotData::Loading;
                issue_detail(binding, ctx);
                true
            }
            _ => false,
        }
    }

    /// Request the description again after a failure
    pub fn retry_description(&mut self, ctx: &FetchContext) -> bool {
        match self.binding {
            Some(binding) if self.description.is_failed() => {
                self.description = SlotData::Loading;
                issue_description(binding, ctx);
                true
            }
            _ => false,
        }
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    pub fn binding(&self) -> Option<SlotBinding> {
        self.binding
    }

    pub fn bound_id(&self) -> Option<Identifier> {
        self.binding.map(|binding| binding.id)
    }

    pub fn detail(&self) -> &SlotData<DetailRecord> {
        &self.detail
    }

    pub fn description(&self) -> &SlotData<DescriptionRecord> {
        &self.description
    }
}

fn into_slot_data<T>(result: Result<Arc<T>, dex_core::FetchError>, id: Identifier, what: &str) -> SlotData<T> {
    match result {
        Ok(record) => SlotData::Ready(record),
        Err(error) => {
            warn!("Failed to fetch {} for {}: {}", what, id, error);
            SlotData::Failed(error)
        }
    }
}

fn issue_detail(binding: SlotBinding, ctx: &FetchContext) {
    let source = Arc::clone(&ctx.source);
    let completions = ctx.completions.clone();
    ctx.runtime.spawn(async move {
        let result = source.detail(binding.id).await;
        let completion = FetchCompletion {
            binding,
            payload: CompletionPayload::Detail(result),
        };
        if completions.send(completion).is_err() {
            trace!("Detail for {} finished after its screen closed", binding.id);
        }
    });
}

fn issue_description(binding: SlotBinding, ctx: &FetchContext) {
    let source = Arc::clone(&ctx.source);
    let completions = ctx.completions.clone();
    ctx.runtime.spawn(async move {
        let result = source.description(binding.id).await;
        let completion = FetchCompletion {
            binding,
            payload: CompletionPayload::Description(result),
        };
        if completions.send(completion).is_err() {
            trace!("Description for {} finished after its screen closed", binding.id);
        }
    });
}
