use serde::{Deserialize, Serialize};
use std::fmt;

use crate::*;

const ADJECTIVES: &[&str] = &["lucky", "ominous", "whimsical", "superb"];
const NOUNS: &[&str] = &["bucket", "targeocache", "slab", "receptacle", "platform", "pot"];

/// Collectible token, identified by where it was minted and its serial there.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geocoin {
    pub minting_location: Cell,
    pub serial_number: u32,
}

impl Geocoin {
    pub const fn new(minting_location: Cell, serial_number: u32) -> Self {
        Self {
            minting_location,
            serial_number,
        }
    }
}

impl fmt::Display for Geocoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.minting_location, self.serial_number)
    }
}

/// Space separated display form of a coin list.
pub fn coins_text(coins: &[Geocoin]) -> String {
    coins
        .iter()
        .map(Geocoin::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-cell coin stack, coins are taken from and deposited at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct Geocache {
    cell: Cell,
    description: String,
    coins: Vec<Geocoin>,
}

impl Geocache {
    /// Generates the initial contents of `cell`, the same cell always yields the same cache.
    pub fn new(cell: Cell, max_initial_coins: u32) -> Self {
        let adjective = pick(&cell.luck_key("descA"), ADJECTIVES);
        let noun = pick(&cell.luck_key("descB"), NOUNS);
        let count = Self::initial_coin_count(cell, max_initial_coins);
        let coins = (0..count).map(|serial| Geocoin::new(cell, serial)).collect();
        log::trace!("generated cache at {} with {} coins", cell, count);
        Self {
            cell,
            description: format!("{} {}", adjective, noun),
            coins,
        }
    }

    pub fn initial_coin_count(cell: Cell, max_initial_coins: u32) -> u32 {
        (luck(&cell.luck_key("initialCoins")) * f64::from(max_initial_coins)).floor() as u32
    }

    /// Rebuilds a cache for `cell` whose coins come from a previously stored memento.
    pub fn restore(cell: Cell, max_initial_coins: u32, memento: &str) -> Result<Self> {
        let mut cache = Self::new(cell, max_initial_coins);
        cache.load_memento(memento)?;
        Ok(cache)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn coins(&self) -> &[Geocoin] {
        &self.coins
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn contents_text(&self) -> String {
        coins_text(&self.coins)
    }

    pub fn to_memento(&self) -> String {
        serde_json::to_string(&self.coins).expect("coin list has only string keys")
    }

    /// Replaces the coin list with the one stored in `memento`, leaving it untouched on error.
    pub fn load_memento(&mut self, memento: &str) -> Result<()> {
        self.coins = serde_json::from_str(memento).map_err(|err| {
            log::warn!("malformed memento for {}: {}", self.cell, err);
            GameError::MalformedMemento
        })?;
        Ok(())
    }

    pub fn take_coin(&mut self) -> Result<Geocoin> {
        self.coins.pop().ok_or(GameError::EmptyCache)
    }

    pub fn deposit_coin(&mut self, coin: Geocoin) {
        self.coins.push(coin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_coins() -> Geocache {
        (0..200)
            .map(|i| Geocache::new(Cell::new(i, -i), 3))
            .find(|cache| cache.coins().len() >= 2)
            .unwrap()
    }

    #[test]
    fn generation_is_deterministic() {
        let cell = Cell::new(369995, -1220533);

        assert_eq!(Geocache::new(cell, 3), Geocache::new(cell, 3));
    }

    #[test]
    fn initial_coins_are_minted_in_order() {
        let cache = cache_with_coins();
        let cell = cache.cell();

        assert_eq!(
            cache.coins().len() as u32,
            Geocache::initial_coin_count(cell, 3)
        );
        for (serial, coin) in cache.coins().iter().enumerate() {
            assert_eq!(*coin, Geocoin::new(cell, serial as u32));
        }
    }

    #[test]
    fn initial_count_stays_below_limit() {
        for i in -30..30 {
            assert!(Geocache::initial_coin_count(Cell::new(i, 2 * i), 3) < 3);
        }
    }

    #[test]
    fn description_uses_word_lists() {
        let cache = Geocache::new(Cell::new(4, 9), 3);
        let (adjective, noun) = cache.description().split_once(' ').unwrap();

        assert!(ADJECTIVES.contains(&adjective));
        assert!(NOUNS.contains(&noun));
    }

    #[test]
    fn memento_round_trip_keeps_order() {
        let mut cache = Geocache::new(Cell::new(0, 0), 0);
        let coins = [
            Geocoin::new(Cell::new(5, -2), 1),
            Geocoin::new(Cell::new(-7, 3), 0),
            Geocoin::new(Cell::new(5, -2), 0),
        ];
        for coin in coins {
            cache.deposit_coin(coin);
        }

        let memento = cache.to_memento();
        let mut restored = Geocache::new(Cell::new(0, 0), 0);
        restored.load_memento(&memento).unwrap();

        assert_eq!(restored.coins(), &coins);
    }

    #[test]
    fn memento_uses_camel_case_records() {
        let mut cache = Geocache::new(Cell::new(0, 0), 0);
        cache.deposit_coin(Geocoin::new(Cell::new(1, -2), 3));

        assert_eq!(
            cache.to_memento(),
            r#"[{"mintingLocation":{"i":1,"j":-2},"serialNumber":3}]"#
        );
    }

    #[test]
    fn malformed_memento_leaves_cache_untouched() {
        let mut cache = cache_with_coins();
        let before = cache.clone();

        assert_eq!(
            cache.load_memento("not json"),
            Err(GameError::MalformedMemento)
        );
        assert_eq!(cache, before);
    }

    #[test]
    fn deposit_then_take_returns_same_coin() {
        let mut cache = cache_with_coins();
        let coin = Geocoin::new(Cell::new(-100, 100), 42);

        cache.deposit_coin(coin);

        assert_eq!(cache.take_coin(), Ok(coin));
    }

    #[test]
    fn take_from_empty_cache_fails() {
        let mut cache = Geocache::new(Cell::new(0, 0), 0);

        assert!(cache.is_empty());
        assert_eq!(cache.take_coin(), Err(GameError::EmptyCache));
    }

    #[test]
    fn contents_text_lists_coins() {
        let mut cache = Geocache::new(Cell::new(0, 0), 0);
        cache.deposit_coin(Geocoin::new(Cell::new(1, 2), 0));
        cache.deposit_coin(Geocoin::new(Cell::new(-1, 2), 5));

        assert_eq!(cache.contents_text(), "1:2#0 -1:2#5");
    }
}
