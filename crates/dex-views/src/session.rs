//! One detail screen: reconciler, three slots and their channels

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};
use dex_core::events::events::{
    CenterCommitted, FetchFailed, NavigationRejected, StaleResultDiscarded,
};
use dex_core::events::EventBus;
use dex_core::navigation::{gesture_channel, GestureReceiver, GestureSender};
use dex_core::{
    AppSettings, Direction, DexSource, GestureEvent, GestureReconciler, Identifier,
    IdentifierSpace, NavigationContext, PagerCommand, SlotIndex, Transition,
};

use crate::cue::CuePlayer;
use crate::detail_view::{ApplyOutcome, DetailViewModel};
use crate::presentation::DetailPresentation;
use crate::slot::{
    CompletionPayload, CompletionReceiver, FetchCompletion, FetchContext, SettledSections,
};

/// State of an open detail screen
///
/// All mutation happens on the thread that calls [`PagerSession::pump`];
/// fetch tasks only report back through the completion channel.
pub struct PagerSession {
    reconciler: GestureReconciler,
    slots: [DetailViewModel; 3],
    fetch: FetchContext,
    completions: CompletionReceiver,
    gestures: GestureReceiver,
    events: Arc<EventBus>,
    bound_revision: Option<u64>,
}

impl PagerSession {
    /// Open a screen centered on `initial` and bind all three slots
    ///
    /// Returns the session and the sender the pager host reports gestures on.
    pub fn open(
        initial: Identifier,
        source: Arc<dyn DexSource>,
        runtime: Handle,
        space: IdentifierSpace,
        events: Arc<EventBus>,
    ) -> (Self, GestureSender) {
        let (sender, gestures) = gesture_channel();
        let (fetch, completions) = FetchContext::new(source, runtime, space);
        let reconciler = GestureReconciler::new(initial, space);
        info!("Opening detail screen at {}", reconciler.center());

        let mut session = Self {
            reconciler,
            slots: SlotIndex::ALL.map(DetailViewModel::new),
            fetch,
            completions,
            gestures,
            events,
            bound_revision: None,
        };
        session.sync_slots();
        (session, sender)
    }

    /// Process every queued gesture and completion
    pub fn pump(&mut self) -> Vec<Transition> {
        let transitions = self.reconciler.drain(&mut self.gestures);
        for transition in &transitions {
            self.publish_transition(*transition);
        }
        self.sync_slots();

        while let Ok(completion) = self.completions.try_recv() {
            self.apply_completion(completion);
        }
        transitions
    }

    /// Feed one host event directly, bypassing the channel
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Transition {
        let transition = self.reconciler.handle(event);
        self.publish_transition(transition);
        self.sync_slots();
        transition
    }

    /// Explicit previous/next
    pub fn move_to_adjacent(&mut self, direction: Direction) -> Transition {
        let transition = self.reconciler.move_to_adjacent(direction);
        self.publish_transition(transition);
        self.sync_slots();
        transition
    }

    /// Retry whatever failed in `slot`
    pub fn retry(&mut self, slot: SlotIndex) -> bool {
        let view = &mut self.slots[slot.index()];
        let detail = view.retry_detail(&self.fetch);
        let description = view.retry_description(&self.fetch);
        detail || description
    }

    /// Route a finished request to its slot
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> ApplyOutcome {
        let binding = completion.binding;
        let failure = match &completion.payload {
            CompletionPayload::Detail(Err(error)) | CompletionPayload::Description(Err(error)) => {
                Some(error.to_string())
            }
            _ => None,
        };
        let resource = completion.payload.resource();

        let outcome = self.slots[binding.slot.index()].apply(completion);
        match outcome {
            ApplyOutcome::Stale => self.events.publish(StaleResultDiscarded {
                slot: binding.slot,
                id: binding.id,
                generation: binding.generation,
            }),
            ApplyOutcome::Applied => {
                if let Some(error) = failure {
                    self.events.publish(FetchFailed {
                        slot: binding.slot,
                        id: binding.id,
                        resource,
                        error,
                    });
                }
            }
        }
        outcome
    }

    /// Wait for the next completion and apply it
    pub async fn settle_next(&mut self) -> Option<ApplyOutcome> {
        let completion = self.completions.recv().await?;
        Some(self.apply_completion(completion))
    }

    /// Hand the slot's cry to `player`; `false` when there is none
    pub fn play_cue(&self, slot: SlotIndex, player: &dyn CuePlayer) -> bool {
        let uri = self.slots[slot.index()]
            .detail()
            .ready()
            .and_then(|record| record.cry_uri.clone());
        match uri {
            Some(uri) => {
                player.play(&uri);
                true
            }
            None => false,
        }
    }

    pub fn slot(&self, slot: SlotIndex) -> &DetailViewModel {
        &self.slots[slot.index()]
    }

    pub fn presentation(&self, slot: SlotIndex, settings: &AppSettings) -> Option<DetailPresentation> {
        DetailPresentation::build(self.slot(slot), settings)
    }

    pub fn center(&self) -> Identifier {
        self.reconciler.center()
    }

    pub fn context(&self) -> NavigationContext {
        self.reconciler.get_context()
    }

    /// Commands for the pager host, in issue order
    pub fn take_commands(&mut self) -> Vec<PagerCommand> {
        self.reconciler.take_commands()
    }

    fn publish_transition(&self, transition: Transition) {
        match transition {
            Transition::Committed { from, to } => {
                self.events.publish(CenterCommitted { from, to });
            }
            Transition::Rejected { center, offset } => {
                self.events.publish(NavigationRejected { center, offset });
            }
            Transition::Pending { .. } | Transition::None => {}
        }
    }

    /// Rebind the slots after the window moved
    fn sync_slots(&mut self) {
        let window = self.reconciler.state().window();
        let revision = window.revision();
        if self.bound_revision == Some(revision) {
            return;
        }

        let ids = window.slots();
        // After a commit the new ids were mostly on screen already; keep what
        // they loaded so the recentered cards do not flash back to loading
        let settled: Vec<SettledSections> = self.slots.iter().filter_map(DetailViewModel::settled).collect();
        for (view, id) in self.slots.iter_mut().zip(ids) {
            let carried = settled.iter().find(|sections| sections.id == id);
            view.rebind(id, &self.fetch, carried);
        }
        debug!("Bound slots to {:?} (revision {})", ids, revision);
        self.bound_revision = Some(revision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use parking_lot::Mutex;
    use dex_core::events::handler_from_fn;
    use dex_core::navigation::ScrollState;
    use dex_core::DetailRecord;
    use dex_data::MemorySource;

    fn id(raw: i64) -> Identifier {
        Identifier::new(raw)
    }

    fn catalog(range: std::ops::RangeInclusive<i64>) -> MemorySource {
        range.fold(MemorySource::new("memory"), |source, raw| {
            source.with_detail(DetailRecord {
                id: id(raw),
                name: format!("entry-{}", raw),
                cry_uri: Some(format!("https://cries.example/{}.ogg", raw)),
                ..DetailRecord::default()
            })
        })
    }

    fn open(initial: i64, source: MemorySource, events: Arc<EventBus>) -> (PagerSession, GestureSender) {
        PagerSession::open(
            id(initial),
            Arc::new(source),
            Handle::current(),
            IdentifierSpace::new(1, 10).unwrap(),
            events,
        )
    }

    fn counter<E: dex_core::events::Event>(events: &EventBus) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        events.subscribe::<E>(handler_from_fn(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    fn send_swipe(sender: &GestureSender, slot: SlotIndex) {
        for event in [
            GestureEvent::ScrollStateChanged(ScrollState::Dragging),
            GestureEvent::PositionChanged(slot),
            GestureEvent::ScrollStateChanged(ScrollState::Settling),
            GestureEvent::ScrollStateChanged(ScrollState::Idle),
        ] {
            sender.send(event).unwrap();
        }
    }

    #[tokio::test]
    async fn test_swipe_commit_rebinds_slots() {
        let events = Arc::new(EventBus::new());
        let commits = counter::<CenterCommitted>(&events);
        let (mut session, sender) = open(5, catalog(1..=10), events);

        assert_eq!(session.slot(SlotIndex::Previous).bound_id(), Some(id(4)));
        let first = session.slot(SlotIndex::Current).binding().unwrap();

        send_swipe(&sender, SlotIndex::Next);
        let transitions = session.pump();
        assert!(transitions.contains(&Transition::Committed { from: id(5), to: id(6) }));
        assert_eq!(commits.load(Ordering::SeqCst), 1);
        assert_eq!(
            session.take_commands(),
            vec![PagerCommand::RecenterWithoutAnimation(SlotIndex::Current)]
        );

        let ids: Vec<_> = SlotIndex::ALL
            .iter()
            .map(|slot| session.slot(*slot).bound_id().unwrap())
            .collect();
        assert_eq!(ids, vec![id(5), id(6), id(7)]);
        let current = session.slot(SlotIndex::Current).binding().unwrap();
        assert_eq!(current.generation, first.generation + 1);
    }

    #[tokio::test]
    async fn test_boundary_swipe_is_rejected() {
        let events = Arc::new(EventBus::new());
        let rejects = counter::<NavigationRejected>(&events);
        let (mut session, sender) = open(10, catalog(8..=10), events);
        let before = session.slot(SlotIndex::Current).binding();

        send_swipe(&sender, SlotIndex::Next);
        session.pump();

        assert_eq!(session.center(), id(10));
        assert_eq!(rejects.load(Ordering::SeqCst), 1);
        assert_eq!(session.slot(SlotIndex::Current).binding(), before);
        assert_eq!(
            session.take_commands(),
            vec![PagerCommand::RecenterWithoutAnimation(SlotIndex::Current)]
        );
        assert!(session.slot(SlotIndex::Next).detail().ready().is_none());
    }

    #[tokio::test]
    async fn test_explicit_move_commands() {
        let (mut session, _sender) = open(1, catalog(1..=3), Arc::new(EventBus::new()));

        assert_eq!(
            session.move_to_adjacent(Direction::Previous),
            Transition::Rejected { center: id(1), offset: -1 }
        );
        assert!(session.take_commands().is_empty());

        session.move_to_adjacent(Direction::Next);
        assert_eq!(
            session.take_commands(),
            vec![
                PagerCommand::AnimateToPage(SlotIndex::Next),
                PagerCommand::RecenterWithoutAnimation(SlotIndex::Current),
            ]
        );
        assert_eq!(session.context().slots, [id(1), id(2), id(3)]);
    }

    #[tokio::test]
    async fn test_results_for_previous_window_are_discarded() {
        let events = Arc::new(EventBus::new());
        let stale = counter::<StaleResultDiscarded>(&events);
        let (mut session, _sender) = open(5, catalog(1..=10), events);

        // Six requests from the first binding are still queued
        session.move_to_adjacent(Direction::Next);

        let mut discarded = 0;
        let mut applied = 0;
        for _ in 0..12 {
            match session.settle_next().await.unwrap() {
                ApplyOutcome::Stale => discarded += 1,
                ApplyOutcome::Applied => applied += 1,
            }
        }
        assert_eq!((discarded, applied), (6, 6));
        assert_eq!(stale.load(Ordering::SeqCst), 6);
        assert_eq!(
            session.slot(SlotIndex::Current).detail().ready().unwrap().id,
            id(6)
        );
    }

    #[tokio::test]
    async fn test_failures_are_published_and_retryable() {
        let events = Arc::new(EventBus::new());
        let failures = Arc::new(Mutex::new(Vec::new()));
        let seen = failures.clone();
        events.subscribe::<FetchFailed>(handler_from_fn(move |event| {
            if let Some(failed) = event.as_any().downcast_ref::<FetchFailed>() {
                seen.lock().push((failed.id, failed.resource));
            }
        }));
        let (mut session, _sender) = open(2, catalog(2..=2), events);

        // Three details and three descriptions; only one detail exists
        for _ in 0..6 {
            session.settle_next().await;
        }
        let failures = failures.lock().clone();
        assert_eq!(failures.len(), 5);
        assert!(failures.contains(&(id(2), "description")));
        assert!(failures.contains(&(id(3), "detail")));

        assert!(session.retry(SlotIndex::Next));
        assert!(session.slot(SlotIndex::Next).detail().is_loading());
        assert!(session.slot(SlotIndex::Current).detail().ready().is_some());
    }

    #[tokio::test]
    async fn test_play_cue_needs_a_loaded_record() {
        struct Recorder(Mutex<Vec<String>>);

        impl CuePlayer for Recorder {
            fn play(&self, uri: &str) {
                self.0.lock().push(uri.to_string());
            }
        }

        let (mut session, _sender) = open(4, catalog(4..=4), Arc::new(EventBus::new()));
        let player = Recorder(Mutex::new(Vec::new()));
        assert!(!session.play_cue(SlotIndex::Current, &player));

        for _ in 0..6 {
            session.settle_next().await;
        }
        assert!(session.play_cue(SlotIndex::Current, &player));
        assert!(!session.play_cue(SlotIndex::Next, &player));
        assert_eq!(player.0.lock().as_slice(), ["https://cries.example/4.ogg"]);
    }

    #[tokio::test]
    async fn test_commit_keeps_loaded_neighbour_on_screen() {
        let (mut session, sender) = open(5, catalog(1..=10), Arc::new(EventBus::new()));
        for _ in 0..6 {
            session.settle_next().await;
        }
        let settings = AppSettings::default();
        let next = session.presentation(SlotIndex::Next, &settings).unwrap();
        assert_eq!(next.name.as_deref(), Some("entry-6"));

        send_swipe(&sender, SlotIndex::Next);
        session.pump();

        let current = session.presentation(SlotIndex::Current, &settings).unwrap();
        assert_eq!(current.id, id(6));
        assert!(!current.loading);
        assert_eq!(current.name.as_deref(), Some("entry-6"));
        let previous = session.presentation(SlotIndex::Previous, &settings).unwrap();
        assert!(!previous.loading);
        assert_eq!(previous.name.as_deref(), Some("entry-5"));
        assert!(session.slot(SlotIndex::Next).detail().is_loading());

        // Only the new Next slot went back to the source
        for _ in 0..2 {
            session.settle_next().await;
        }
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(session.completions.try_recv().is_err());
        assert_eq!(session.slot(SlotIndex::Next).detail().ready().unwrap().name, "entry-7");
    }
}
