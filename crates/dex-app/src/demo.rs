//! Built-in demo catalog
//! Used when no data directory is configured

use dex_core::{BaseStat, DescriptionRecord, DetailRecord, Identifier};
use dex_data::MemorySource;

/// id, name, types, height (dm), weight (hg), moves, stats, description
type DemoEntry = (
    i64,
    &'static str,
    &'static [&'static str],
    u32,
    u32,
    &'static [&'static str],
    [u32; 6],
    &'static str,
);

const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

const ENTRIES: &[DemoEntry] = &[
    (1, "bulbasaur", &["grass", "poison"], 7, 69, &["razor-wind", "swords-dance"], [45, 49, 49, 65, 65, 45],
        "A strange seed was planted on its back at birth. The plant sprouts and grows with this Pokémon."),
    (2, "ivysaur", &["grass", "poison"], 10, 130, &["swords-dance", "cut"], [60, 62, 63, 80, 80, 60],
        "When the bulb on its back grows large, it appears to lose the ability to stand on its hind legs."),
    (3, "venusaur", &["grass", "poison"], 20, 1000, &["swords-dance", "cut"], [80, 82, 83, 100, 100, 80],
        "The plant blooms when it is absorbing solar energy. It stays on the move to seek sunlight."),
    (4, "charmander", &["fire"], 6, 85, &["mega-punch", "fire-punch"], [39, 52, 43, 60, 50, 65],
        "Obviously prefers hot places. When it rains, steam is said to spout from the tip of its tail."),
    (5, "charmeleon", &["fire"], 11, 190, &["mega-punch", "fire-punch"], [58, 64, 58, 80, 65, 80],
        "When it swings its burning tail, it elevates the temperature to unbearably high levels."),
    (6, "charizard", &["fire", "flying"], 17, 905, &["mega-punch", "fire-punch"], [78, 84, 78, 109, 85, 100],
        "Spits fire that is hot enough to melt boulders. Known to cause forest fires unintentionally."),
    (7, "squirtle", &["water"], 5, 90, &["mega-punch", "ice-punch"], [44, 48, 65, 50, 64, 43],
        "After birth, its back swells and hardens into a shell. Powerfully sprays foam from its mouth."),
    (8, "wartortle", &["water"], 10, 225, &["mega-punch", "ice-punch"], [59, 63, 80, 65, 80, 58],
        "Often hides in water to stalk unwary prey. For swimming fast, it moves its ears to maintain balance."),
    (9, "blastoise", &["water"], 16, 855, &["mega-punch", "ice-punch"], [79, 83, 100, 85, 105, 78],
        "A brutal Pokémon with pressurized water jets on its shell. They are used for high speed tackles."),
];

/// Create the demo catalog source
pub fn create_demo_source() -> MemorySource {
    ENTRIES.iter().fold(MemorySource::new("demo"), |source, entry| {
        let (id, name, types, height, weight, moves, stats, text) = *entry;
        source
            .with_detail(DetailRecord {
                id: Identifier::new(id),
                name: name.to_string(),
                types: types.iter().map(|t| t.to_string()).collect(),
                height: Some(height),
                weight: Some(weight),
                moves: moves.iter().map(|m| m.to_string()).collect(),
                stats: STAT_NAMES
                    .iter()
                    .zip(stats)
                    .map(|(name, value)| BaseStat { name: name.to_string(), value })
                    .collect(),
                artwork_uri: Some(format!(
                    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{}.png",
                    id
                )),
                cry_uri: Some(format!(
                    "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest/{}.ogg",
                    id
                )),
            })
            .with_description(DescriptionRecord {
                id: Identifier::new(id),
                language: "en".to_string(),
                text: Some(text.to_string()),
            })
    })
}

/// Highest id in the demo catalog
pub fn demo_max_id() -> i64 {
    ENTRIES.iter().map(|entry| entry.0).max().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::DexSource;

    #[tokio::test]
    async fn test_demo_catalog_is_complete() {
        let source = create_demo_source();
        assert_eq!(source.len(), ENTRIES.len());
        assert_eq!(demo_max_id(), 9);

        for raw in 1..=demo_max_id() {
            let detail = source.detail(Identifier::new(raw)).await.unwrap();
            assert_eq!(detail.stats.len(), 6);
            assert!(source.description(Identifier::new(raw)).await.is_ok());
        }
    }
}
