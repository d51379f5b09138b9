use std::fmt;
use serde::{Serialize, Deserialize};

/// Default lowest valid identifier
pub const MIN_ID: i64 = 1;

/// Default highest valid identifier
pub const MAX_ID: i64 = 1000;

/// Ordinal identifier of a catalog entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(i64);

impl Identifier {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Identifier `delta` positions away; saturates instead of wrapping
    pub fn offset(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a single step through the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Signed step (-1 or +1)
    pub fn offset(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }

    pub fn from_offset(offset: i64) -> Option<Self> {
        match offset {
            -1 => Some(Direction::Previous),
            1 => Some(Direction::Next),
            _ => None,
        }
    }
}

/// The contiguous range of valid identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierSpace {
    min: Identifier,
    max: Identifier,
}

impl IdentifierSpace {
    /// Create a space covering `min..=max`; `None` when the range is empty
    pub fn new(min: i64, max: i64) -> Option<Self> {
        if min > max {
            return None;
        }
        Some(Self {
            min: Identifier(min),
            max: Identifier(max),
        })
    }

    pub fn min(&self) -> Identifier {
        self.min
    }

    pub fn max(&self) -> Identifier {
        self.max
    }

    /// Number of valid identifiers
    pub fn len(&self) -> u64 {
        self.max.0.abs_diff(self.min.0).saturating_add(1)
    }

    pub fn is_valid(&self, id: Identifier) -> bool {
        self.min <= id && id <= self.max
    }

    /// Whether stepping `offset` away from `center` leaves the space
    pub fn would_exceed_bounds(&self, center: Identifier, offset: i64) -> bool {
        !self.is_valid(center.offset(offset))
    }

    pub fn clamp(&self, id: Identifier) -> Identifier {
        id.clamp(self.min, self.max)
    }
}

impl Default for IdentifierSpace {
    fn default() -> Self {
        Self {
            min: Identifier(MIN_ID),
            max: Identifier(MAX_ID),
        }
    }
}
