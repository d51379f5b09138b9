//! Gesture reconciliation state machine

use super::{
    Direction, GestureEvent, GestureReceiver, Identifier, IdentifierSpace, NavigationContext,
    PagerCommand, PagerWindow, ScrollState, SlotIndex,
};
use tracing::{debug, warn};

/// Resting phase of the reconciler
///
/// Committing is not a phase: it starts and finishes inside one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scrolling,
}

/// Result of feeding one input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Input caused no state change
    None,
    /// Gesture in progress, offset not yet committed
    Pending { offset: i64 },
    /// Center moved and slots were recomputed
    Committed { from: Identifier, to: Identifier },
    /// Move would leave the identifier space; nothing changed
    Rejected { center: Identifier, offset: i64 },
}

/// Navigation state of one detail screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    window: PagerWindow,
    pending_offset: i64,
    phase: Phase,
}

impl WindowState {
    pub fn new(center: Identifier) -> Self {
        Self {
            window: PagerWindow::new(center),
            pending_offset: 0,
            phase: Phase::Idle,
        }
    }

    /// Apply one host event
    pub fn apply(&mut self, event: GestureEvent, space: &IdentifierSpace) -> Transition {
        match event {
            GestureEvent::PositionChanged(slot) => {
                // Last reported position wins; only the value at idle matters
                self.phase = Phase::Scrolling;
                self.pending_offset = slot.offset();
                Transition::Pending { offset: self.pending_offset }
            }
            GestureEvent::ScrollStateChanged(ScrollState::Idle)
                if self.phase == Phase::Scrolling && self.pending_offset != 0 =>
            {
                self.commit(space)
            }
            GestureEvent::ScrollStateChanged(_) => Transition::None,
        }
    }

    /// Programmatic single step, committed immediately
    pub fn request_move(&mut self, direction: Direction, space: &IdentifierSpace) -> Transition {
        self.phase = Phase::Scrolling;
        self.pending_offset = direction.offset();
        self.commit(space)
    }

    fn commit(&mut self, space: &IdentifierSpace) -> Transition {
        let center = self.window.center();
        let offset = self.pending_offset;
        self.pending_offset = 0;
        self.phase = Phase::Idle;

        if space.would_exceed_bounds(center, offset) {
            return Transition::Rejected { center, offset };
        }

        let target = center.offset(offset);
        self.window.recenter(target);
        Transition::Committed { from: center, to: target }
    }

    pub fn center(&self) -> Identifier {
        self.window.center()
    }

    pub fn pending_offset(&self) -> i64 {
        self.pending_offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn window(&self) -> &PagerWindow {
        &self.window
    }
}

/// Owns the window state of a detail screen and talks to the pager host
pub struct GestureReconciler {
    state: WindowState,
    space: IdentifierSpace,
    commands: Vec<PagerCommand>,
}

impl GestureReconciler {
    /// Create a reconciler centered on `initial`
    ///
    /// An initial id outside `space` is clamped into it.
    pub fn new(initial: Identifier, space: IdentifierSpace) -> Self {
        let center = space.clamp(initial);
        if center != initial {
            warn!("Initial entry {} outside {}..={}, opening {} instead", initial, space.min(), space.max(), center);
        }

        Self {
            state: WindowState::new(center),
            space,
            commands: Vec::new(),
        }
    }

    /// Handle one event from the pager host
    pub fn handle(&mut self, event: GestureEvent) -> Transition {
        let transition = self.state.apply(event, &self.space);

        match transition {
            Transition::Committed { from, to } => {
                debug!("Committed swipe {} -> {}", from, to);
                self.commands.push(PagerCommand::RecenterWithoutAnimation(SlotIndex::Current));
            }
            Transition::Rejected { center, offset } => {
                debug!("Rejected swipe from {} by {}: out of range", center, offset);
                // The host is resting on an edge slot; put it back
                self.commands.push(PagerCommand::RecenterWithoutAnimation(SlotIndex::Current));
            }
            Transition::Pending { .. } | Transition::None => {}
        }

        transition
    }

    /// Explicit previous/next request
    pub fn move_to_adjacent(&mut self, direction: Direction) -> Transition {
        let transition = self.state.request_move(direction, &self.space);

        match transition {
            Transition::Committed { from, to } => {
                debug!("Committed move {} -> {}", from, to);
                self.commands.push(PagerCommand::AnimateToPage(SlotIndex::from_direction(direction)));
                self.commands.push(PagerCommand::RecenterWithoutAnimation(SlotIndex::Current));
            }
            Transition::Rejected { center, offset } => {
                debug!("Rejected move from {} by {}: out of range", center, offset);
            }
            Transition::Pending { .. } | Transition::None => {}
        }

        transition
    }

    /// Handle every event currently queued on `receiver`
    pub fn drain(&mut self, receiver: &mut GestureReceiver) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Some(event) = receiver.try_next() {
            transitions.push(self.handle(event));
        }
        transitions
    }

    /// Commands issued since the last call, in order
    pub fn take_commands(&mut self) -> Vec<PagerCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn space(&self) -> IdentifierSpace {
        self.space
    }

    pub fn center(&self) -> Identifier {
        self.state.center()
    }

    /// Get current navigation context
    pub fn get_context(&self) -> NavigationContext {
        NavigationContext {
            center: self.state.center(),
            slots: self.state.window().slots(),
            pending_offset: self.state.pending_offset(),
            phase: self.state.phase(),
            space: self.space,
        }
    }
}
