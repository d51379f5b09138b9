//! Records shared between sources, view models and the shell

use serde::{Serialize, Deserialize};

use crate::navigation::Identifier;

/// A named base stat (hp, attack, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

/// Displayable data of one entry
///
/// Every optional part may be missing; views render what is there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: Identifier,
    pub name: String,

    /// Type tags, primary type first
    #[serde(default)]
    pub types: Vec<String>,

    /// Height in decimetres
    #[serde(default)]
    pub height: Option<u32>,

    /// Weight in hectograms
    #[serde(default)]
    pub weight: Option<u32>,

    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub stats: Vec<BaseStat>,

    #[serde(default)]
    pub artwork_uri: Option<String>,

    /// Audio cue played on request
    #[serde(default)]
    pub cry_uri: Option<String>,
}

impl DetailRecord {
    /// Primary type, which drives the accent color
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

/// Supplementary text of one entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRecord {
    pub id: Identifier,
    /// Language the text was selected for
    pub language: String,
    /// `None` when no entry exists in that language
    pub text: Option<String>,
}

/// List entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: Identifier,
    pub name: String,
}

impl EntrySummary {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Identifier::new(id),
            name: name.into(),
        }
    }
}

/// Offset into the remote entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(pub usize);

/// One page of the entry list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<EntrySummary>,
    /// `None` when the list is exhausted
    pub next_cursor: Option<Cursor>,
}
