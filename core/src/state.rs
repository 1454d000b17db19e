use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::*;

/// Everything that survives a reload.
///
/// Field names follow the persisted record layout, the cache map is written as `[cell, memento]` pairs in cell order
/// so identical states always produce identical records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(rename = "playerLocationData")]
    pub player: LatLng,
    #[serde(rename = "geocoinListData")]
    pub coins: Vec<Geocoin>,
    #[serde(rename = "geocachePopupData", with = "memento_pairs")]
    pub mementos: BTreeMap<Cell, String>,
    #[serde(rename = "coordinateData")]
    pub trail: Vec<LatLng>,
}

impl GameState {
    pub fn default_at(origin: LatLng) -> Self {
        Self {
            player: origin,
            coins: Vec::new(),
            mementos: BTreeMap::new(),
            trail: Vec::new(),
        }
    }

    /// Clears inventory, mementos and trail, and puts the player back at `origin`.
    pub fn reset(&mut self, origin: LatLng) {
        *self = Self::default_at(origin);
    }

    pub fn to_record(&self) -> String {
        serde_json::to_string(self).expect("game state has only string keys")
    }

    pub fn from_record(record: &str) -> Result<Self> {
        serde_json::from_str(record).map_err(|err| {
            log::warn!("malformed game record: {}", err);
            GameError::MalformedRecord
        })
    }

    pub fn record_memento(&mut self, cache: &Geocache) {
        self.mementos.insert(cache.cell(), cache.to_memento());
    }

    pub fn memento(&self, cell: Cell) -> Option<&str> {
        self.mementos.get(&cell).map(String::as_str)
    }
}

impl StorageKey for GameState {
    const KEY: &'static str = "geocoin:state";
}

mod memento_pairs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    use crate::Cell;

    pub(super) fn serialize<S: Serializer>(
        mementos: &BTreeMap<Cell, String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(mementos.iter())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Cell, String>, D::Error> {
        let pairs = Vec::<(Cell, String)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> GameState {
        let mut state = GameState::default_at(LatLng::new(36.9995, -122.0533));
        let cell = Cell::new(369990, -1220530);
        state.coins.push(Geocoin::new(cell, 1));
        state.trail.push(LatLng::new(36.9996, -122.0533));
        state
            .mementos
            .insert(cell, r#"[{"mintingLocation":{"i":369990,"j":-1220530},"serialNumber":0}]"#.into());
        state.mementos.insert(Cell::new(-1, 2), "[]".into());
        state
    }

    #[test]
    fn record_uses_persisted_field_layout() {
        let mut state = GameState::default_at(LatLng::new(1.5, -2.5));
        state.mementos.insert(Cell::new(3, -4), "[]".into());

        assert_eq!(
            state.to_record(),
            r#"{"playerLocationData":{"lat":1.5,"lng":-2.5},"geocoinListData":[],"geocachePopupData":[[{"i":3,"j":-4},"[]"]],"coordinateData":[]}"#
        );
    }

    #[test]
    fn record_round_trips() {
        let state = sample_state();

        let restored = GameState::from_record(&state.to_record()).unwrap();

        assert_eq!(restored, state);
    }

    #[test]
    fn record_is_stable_across_saves() {
        let state = sample_state();

        assert_eq!(state.to_record(), state.to_record());
        assert_eq!(
            GameState::from_record(&state.to_record()).unwrap().to_record(),
            state.to_record()
        );
    }

    #[test]
    fn positions_round_trip_exactly() {
        for n in 0..20_000 {
            let point = LatLng::new(
                luck(&format!("lat,{}", n)) * 180.0 - 90.0,
                luck(&format!("lng,{}", n)) * 360.0 - 180.0,
            );
            let state = GameState::default_at(point);

            let restored = GameState::from_record(&state.to_record()).unwrap();

            assert_eq!(restored.player, point, "sample {}", n);
        }
    }

    #[test]
    fn long_walk_round_trips_exactly() {
        let mut state = GameState::default_at(GameConfig::MERRILL_CLASSROOM);
        for n in 0..20_000 {
            let (di, dj) = pick(&format!("step,{}", n), &Direction::ALL).delta();
            state.player = state
                .player
                .offset(f64::from(di) * 1e-4, f64::from(dj) * 1e-4);
            state.trail.push(state.player);
        }
        let record = state.to_record();

        let restored = GameState::from_record(&record).unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.to_record(), record);
    }

    #[test]
    fn malformed_record_is_rejected() {
        assert_eq!(
            GameState::from_record("{\"geocoinListData\": 3}"),
            Err(GameError::MalformedRecord)
        );
        assert_eq!(GameState::from_record(""), Err(GameError::MalformedRecord));
    }

    #[test]
    fn reset_clears_everything_but_origin() {
        let origin = LatLng::new(0.25, 0.75);
        let mut state = sample_state();

        state.reset(origin);

        assert!(state.coins.is_empty());
        assert!(state.trail.is_empty());
        assert!(state.mementos.is_empty());
        assert_eq!(state.player, origin);
    }
}
