//! Pager host events, commands and the gesture channel

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::SlotIndex;

/// Scroll state reported by the pager host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Dragging,
    Settling,
    Idle,
}

/// Raw event delivered by the pager host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// The host's visible page changed (not yet committed)
    PositionChanged(SlotIndex),
    ScrollStateChanged(ScrollState),
}

/// Command issued back to the pager host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerCommand {
    /// Jump to the slot with no visible transition
    RecenterWithoutAnimation(SlotIndex),
    /// Animate to the slot (explicit previous/next)
    AnimateToPage(SlotIndex),
}

/// Sending half kept by the pager host
pub type GestureSender = mpsc::UnboundedSender<GestureEvent>;

/// Receiving half drained by the reconciler's owner
pub struct GestureReceiver {
    inner: mpsc::UnboundedReceiver<GestureEvent>,
}

impl GestureReceiver {
    /// Next queued event, without waiting
    pub fn try_next(&mut self) -> Option<GestureEvent> {
        match self.inner.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next event; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<GestureEvent> {
        self.inner.recv().await
    }
}

/// Create the channel that carries gesture events from the host
pub fn gesture_channel() -> (GestureSender, GestureReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, GestureReceiver { inner: rx })
}
