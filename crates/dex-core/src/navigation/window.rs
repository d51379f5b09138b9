//! The three-slot pager window

use super::{Direction, Identifier};

/// One of the three fixed pager positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotIndex {
    Previous,
    Current,
    Next,
}

impl SlotIndex {
    pub const ALL: [SlotIndex; 3] = [SlotIndex::Previous, SlotIndex::Current, SlotIndex::Next];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            SlotIndex::Previous => 0,
            SlotIndex::Current => 1,
            SlotIndex::Next => 2,
        }
    }

    /// Offset of this slot relative to the center slot
    pub fn offset(self) -> i64 {
        self.index() as i64 - 1
    }

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Previous => SlotIndex::Previous,
            Direction::Next => SlotIndex::Next,
        }
    }
}

/// Slot identifiers around a center
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerWindow {
    center: Identifier,
    slots: [Identifier; 3],
    /// Bumped on every effective recenter
    revision: u64,
}

impl PagerWindow {
    /// Create a window centered on `center`
    pub fn new(center: Identifier) -> Self {
        Self {
            center,
            slots: Self::slots_around(center),
            revision: 0,
        }
    }

    /// The three identifiers bound around `center`
    pub fn slots_around(center: Identifier) -> [Identifier; 3] {
        [center.offset(-1), center, center.offset(1)]
    }

    /// Rebind the slots around `center`
    ///
    /// Returns `false` without touching anything when the window is already
    /// centered there.
    pub fn recenter(&mut self, center: Identifier) -> bool {
        if center == self.center {
            return false;
        }
        self.center = center;
        self.slots = Self::slots_around(center);
        self.revision += 1;
        true
    }

    pub fn center(&self) -> Identifier {
        self.center
    }

    pub fn slots(&self) -> [Identifier; 3] {
        self.slots
    }

    pub fn slot(&self, slot: SlotIndex) -> Identifier {
        self.slots[slot.index()]
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
