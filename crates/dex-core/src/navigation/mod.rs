mod engine;
mod gesture;
mod position;
mod window;

pub use engine::{GestureReconciler, Phase, Transition, WindowState};
pub use gesture::{
    gesture_channel, GestureEvent, GestureReceiver, GestureSender, PagerCommand, ScrollState,
};
pub use position::{Direction, Identifier, IdentifierSpace, MAX_ID, MIN_ID};
pub use window::{PagerWindow, SlotIndex};

/// Snapshot of a detail screen's navigation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    pub center: Identifier,
    pub slots: [Identifier; 3],
    pub pending_offset: i64,
    pub phase: Phase,
    pub space: IdentifierSpace,
}

impl NavigationContext {
    /// Whether a step in `direction` would be accepted
    pub fn can_move(&self, direction: Direction) -> bool {
        !self.space.would_exceed_bounds(self.center, direction.offset())
    }
}
