//! Display model of a detail card
//!
//! Turns whatever a slot currently holds into plain strings and numbers the
//! shell can lay out. Every section is optional: a missing record, field or
//! language simply leaves that section empty.

use dex_core::{AppSettings, BaseStat, Identifier, SlotIndex};

use crate::detail_view::DetailViewModel;
use crate::slot::SlotData;

/// Stats shown when the detail record is not available
pub const BASE_STATS: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

/// Highest value a single base stat can reach
pub const MAX_STAT_VALUE: u32 = 255;

/// One row of the base stats section
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub label: String,
    pub value: u32,
    /// `value / MAX_STAT_VALUE`, clamped to `0.0..=1.0`
    pub ratio: f32,
}

/// Everything a detail card shows
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPresentation {
    pub slot: SlotIndex,
    pub id: Identifier,
    pub number_label: String,
    pub name: Option<String>,
    pub types: Vec<String>,
    /// Drives the card accent color
    pub accent_type: Option<String>,
    pub weight: Option<String>,
    pub size: Option<String>,
    pub moves: Vec<String>,
    pub bio: Option<String>,
    pub stats: Vec<StatLine>,
    pub artwork_uri: Option<String>,
    pub cry_uri: Option<String>,
    pub loading: bool,
    pub detail_failed: bool,
    pub description_failed: bool,
    pub out_of_range: bool,
}

impl DetailPresentation {
    /// Build the card of a bound slot; `None` for a slot that was never bound
    pub fn build(view: &DetailViewModel, settings: &AppSettings) -> Option<Self> {
        let id = view.bound_id()?;
        let detail = view.detail().ready();
        let description = view.description().ready();

        let stats = match detail {
            Some(record) if !record.stats.is_empty() => record.stats.iter().map(stat_line).collect(),
            _ => BASE_STATS
                .iter()
                .map(|name| stat_line(&BaseStat { name: name.to_string(), value: 0 }))
                .collect(),
        };

        Some(Self {
            slot: view.slot(),
            id,
            number_label: number_label(id),
            name: detail.map(|record| record.name.clone()),
            types: detail.map(|record| record.types.clone()).unwrap_or_default(),
            accent_type: detail.and_then(|record| record.primary_type().map(str::to_string)),
            weight: detail.and_then(|record| record.weight).map(format_weight),
            size: detail.and_then(|record| record.height).map(format_size),
            moves: detail
                .map(|record| record.moves.iter().take(settings.moves_shown).cloned().collect())
                .unwrap_or_default(),
            bio: description.and_then(|record| record.text.clone()),
            stats,
            artwork_uri: detail.and_then(|record| record.artwork_uri.clone()),
            cry_uri: detail.and_then(|record| record.cry_uri.clone()),
            loading: view.detail().is_loading() || view.description().is_loading(),
            detail_failed: view.detail().is_failed(),
            description_failed: view.description().is_failed(),
            out_of_range: matches!(view.detail(), SlotData::OutOfRange),
        })
    }

    /// Whether there is anything to play
    pub fn has_cue(&self) -> bool {
        self.cry_uri.is_some()
    }
}

/// `# 001` style label
pub fn number_label(id: Identifier) -> String {
    format!("# {:03}", id.get())
}

/// Hectograms to `6.9 kg`
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", hectograms as f32 / 10.0)
}

/// Decimetres to `0.7 m`
pub fn format_size(decimetres: u32) -> String {
    format!("{:.1} m", decimetres as f32 / 10.0)
}

/// Short label of a stat name
pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_uppercase(),
    }
}

fn stat_line(stat: &BaseStat) -> StatLine {
    StatLine {
        label: stat_label(&stat.name),
        value: stat.value,
        ratio: (stat.value as f32 / MAX_STAT_VALUE as f32).clamp(0.0, 1.0),
    }
}
