//! Three-slot pager host
//!
//! Turns pointer drags into gesture events for the session and carries out
//! the commands the session sends back. The host only ever shows the three
//! slots; which entries they hold is decided by the session.

use std::time::{Duration, Instant};
use egui::{Key, Rect, Sense, Ui, Vec2};
use tracing::trace;
use dex_core::navigation::{GestureSender, ScrollState};
use dex_core::{AppSettings, Direction, GestureEvent, PagerCommand, SlotIndex};
use dex_views::{CuePlayer, PagerSession};

use crate::detail_card::detail_card;
use crate::theme::Theme;

const SETTLE_DURATION: Duration = Duration::from_millis(180);
const SLIDE_DURATION: Duration = Duration::from_millis(250);

/// A running scroll animation
#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Tween {
    fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            started: Instant::now(),
            duration,
        }
    }

    fn value(&self, now: Instant) -> f32 {
        let t = now.duration_since(self.started).as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * ease_out(t)
    }

    fn finished(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.duration
    }
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Resting,
    Dragging,
    /// Finger lifted, snapping to the reported page
    Settling(Tween),
    /// Explicit move, sliding the new center in
    Sliding(Tween),
}

/// Pager host state kept across frames
pub struct PagerView {
    sender: GestureSender,
    /// Horizontal scroll relative to the current slot, in points
    scroll_x: f32,
    width: f32,
    reported: SlotIndex,
    motion: Motion,
}

impl PagerView {
    pub fn new(sender: GestureSender) -> Self {
        Self {
            sender,
            scroll_x: 0.0,
            width: 1.0,
            reported: SlotIndex::Current,
            motion: Motion::Resting,
        }
    }

    /// Run one frame of the pager
    pub fn show(
        &mut self,
        ui: &mut Ui,
        session: &mut PagerSession,
        settings: &AppSettings,
        theme: &Theme,
        cues: &dyn CuePlayer,
    ) {
        let context = session.context();
        ui.horizontal(|ui| {
            let previous = ui.add_enabled(context.can_move(Direction::Previous), egui::Button::new("◀ Previous"));
            if previous.clicked() {
                session.move_to_adjacent(Direction::Previous);
            }
            let next = ui.add_enabled(context.can_move(Direction::Next), egui::Button::new("Next ▶"));
            if next.clicked() {
                session.move_to_adjacent(Direction::Next);
            }
        });

        let (left, right) = ui.input(|i| (i.key_pressed(Key::ArrowLeft), i.key_pressed(Key::ArrowRight)));
        if left {
            session.move_to_adjacent(Direction::Previous);
        }
        if right {
            session.move_to_adjacent(Direction::Next);
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
        self.width = rect.width().max(1.0);

        if response.drag_started() && matches!(self.motion, Motion::Resting) {
            self.motion = Motion::Dragging;
            self.send(GestureEvent::ScrollStateChanged(ScrollState::Dragging));
        }
        if matches!(self.motion, Motion::Dragging) {
            if response.dragged() {
                self.scroll_x = (self.scroll_x - response.drag_delta().x).clamp(-self.width, self.width);
                let page = page_for_scroll(self.scroll_x, self.width);
                if page != self.reported {
                    self.reported = page;
                    self.send(GestureEvent::PositionChanged(page));
                }
            }
            if response.drag_released() {
                let target = self.reported.offset() as f32 * self.width;
                self.motion = Motion::Settling(Tween::new(self.scroll_x, target, SETTLE_DURATION));
                self.send(GestureEvent::ScrollStateChanged(ScrollState::Settling));
            }
        }

        self.advance(Instant::now());
        session.pump();
        for command in session.take_commands() {
            self.apply(command);
        }

        self.draw_slots(ui, rect, session, settings, theme, cues);

        if !matches!(self.motion, Motion::Resting) {
            ui.ctx().request_repaint();
        } else if SlotIndex::ALL.iter().any(|slot| {
            let view = session.slot(*slot);
            view.detail().is_loading() || view.description().is_loading()
        }) {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }
    }

    fn advance(&mut self, now: Instant) {
        match self.motion {
            Motion::Settling(tween) => {
                self.scroll_x = tween.value(now);
                if tween.finished(now) {
                    self.scroll_x = tween.to;
                    self.motion = Motion::Resting;
                    self.send(GestureEvent::ScrollStateChanged(ScrollState::Idle));
                }
            }
            Motion::Sliding(tween) => {
                self.scroll_x = tween.value(now);
                if tween.finished(now) {
                    self.scroll_x = 0.0;
                    self.motion = Motion::Resting;
                }
            }
            Motion::Resting | Motion::Dragging => {}
        }
    }

    fn apply(&mut self, command: PagerCommand) {
        trace!("Pager command {:?}", command);
        match command {
            PagerCommand::RecenterWithoutAnimation(slot) => {
                self.reported = slot;
                // A running slide already ends on the current slot
                if !matches!(self.motion, Motion::Sliding(_)) {
                    self.scroll_x = slot.offset() as f32 * self.width;
                    self.motion = Motion::Resting;
                }
            }
            PagerCommand::AnimateToPage(slot) => {
                // The window has already moved: start from where the old
                // center now sits and slide the new one in
                let from = -(slot.offset() as f32) * self.width;
                self.reported = SlotIndex::Current;
                self.scroll_x = from;
                self.motion = Motion::Sliding(Tween::new(from, 0.0, SLIDE_DURATION));
            }
        }
    }

    fn draw_slots(
        &self,
        ui: &mut Ui,
        rect: Rect,
        session: &mut PagerSession,
        settings: &AppSettings,
        theme: &Theme,
        cues: &dyn CuePlayer,
    ) {
        for slot in SlotIndex::ALL {
            let card_rect = rect.translate(Vec2::new(
                slot.offset() as f32 * self.width - self.scroll_x,
                0.0,
            ));
            if !card_rect.intersects(rect) {
                continue;
            }

            let card = session.presentation(slot, settings);
            let action = ui
                .allocate_ui_at_rect(card_rect.shrink2(Vec2::new(8.0, 0.0)), |ui| {
                    ui.set_clip_rect(rect);
                    ui.push_id(("pager_slot", slot.index()), |ui| detail_card(ui, card.as_ref(), theme))
                        .inner
                })
                .inner;

            if action.retry {
                session.retry(slot);
            }
            if action.play_cue {
                session.play_cue(slot, cues);
            }
        }
    }

    fn send(&self, event: GestureEvent) {
        if self.sender.send(event).is_err() {
            trace!("Gesture {:?} dropped, session closed", event);
        }
    }
}

/// Page the host is showing for a scroll position
pub fn page_for_scroll(scroll_x: f32, width: f32) -> SlotIndex {
    let index = (scroll_x / width).round().clamp(-1.0, 1.0) as i64 + 1;
    SlotIndex::from_index(index as usize).unwrap_or(SlotIndex::Current)
}

fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
