use serde::{Deserialize, Serialize};

pub use board::*;
pub use cache::*;
pub use error::*;
pub use luck::*;
pub use session::*;
pub use state::*;
pub use store::*;
pub use types::*;

mod board;
mod cache;
mod error;
mod luck;
mod session;
mod state;
mod store;
mod types;

/// Tuning knobs of a game, all fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Where new and reset games place the player.
    pub origin: LatLng,
    /// Tile edge length in degrees.
    pub tile_degrees: f64,
    /// Radius of the board's neighborhood queries.
    pub visibility_radius: Coord,
    /// Half width of the window caches are spawned in, independent from `visibility_radius`.
    pub neighborhood_size: Coord,
    pub spawn_probability: f64,
    /// Caches start with `0..max_initial_coins` coins.
    pub max_initial_coins: u32,
}

impl GameConfig {
    pub const MERRILL_CLASSROOM: LatLng = LatLng::new(36.9995, -122.0533);
    pub const TILE_DEGREES: f64 = 1e-4;
    /// Smallest tile that keeps every cell of a valid geolocation, plus its window, inside `Coord`.
    pub const MIN_TILE_DEGREES: f64 = 1e-7;
    pub const NEIGHBORHOOD_SIZE: Coord = 8;
    pub const SPAWN_PROBABILITY: f64 = 0.1;
    pub const MAX_INITIAL_COINS: u32 = 3;

    pub const fn new_unchecked(
        origin: LatLng,
        tile_degrees: f64,
        visibility_radius: Coord,
        neighborhood_size: Coord,
        spawn_probability: f64,
    ) -> Self {
        Self {
            origin,
            tile_degrees,
            visibility_radius,
            neighborhood_size,
            spawn_probability,
            max_initial_coins: Self::MAX_INITIAL_COINS,
        }
    }

    /// Builds a config, replacing values that would break the grid math.
    pub fn new(
        origin: LatLng,
        tile_degrees: f64,
        visibility_radius: Coord,
        neighborhood_size: Coord,
        spawn_probability: f64,
    ) -> Self {
        Self::new_unchecked(
            origin,
            tile_degrees,
            visibility_radius,
            neighborhood_size,
            spawn_probability,
        )
        .sanitized()
    }

    pub fn sanitized(self) -> Self {
        let tile_degrees = if self.tile_degrees.is_finite() && self.tile_degrees > 0.0 {
            if self.tile_degrees < Self::MIN_TILE_DEGREES {
                log::warn!(
                    "tile size {} too small, using {}",
                    self.tile_degrees,
                    Self::MIN_TILE_DEGREES
                );
            }
            self.tile_degrees.max(Self::MIN_TILE_DEGREES)
        } else {
            log::warn!(
                "invalid tile size {}, using {}",
                self.tile_degrees,
                Self::TILE_DEGREES
            );
            Self::TILE_DEGREES
        };
        let spawn_probability = if self.spawn_probability.is_nan() {
            Self::SPAWN_PROBABILITY
        } else {
            self.spawn_probability.clamp(0.0, 1.0)
        };
        Self {
            tile_degrees,
            visibility_radius: self.visibility_radius.clamp(0, 64),
            neighborhood_size: self.neighborhood_size.clamp(1, 64),
            spawn_probability,
            ..self
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            Self::MERRILL_CLASSROOM,
            Self::TILE_DEGREES,
            Self::NEIGHBORHOOD_SIZE,
            Self::NEIGHBORHOOD_SIZE,
            Self::SPAWN_PROBABILITY,
        )
    }
}

/// Outcome of moving a coin between a cache and the player
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransferOutcome {
    NoChange,
    Transferred,
}

impl TransferOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Transferred => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_repairs_broken_values() {
        let config = GameConfig::new(LatLng::default(), -1.0, -3, 0, 7.5);

        assert_eq!(config.tile_degrees, GameConfig::TILE_DEGREES);
        assert_eq!(config.visibility_radius, 0);
        assert_eq!(config.neighborhood_size, 1);
        assert_eq!(config.spawn_probability, 1.0);
    }

    #[test]
    fn sanitized_clamps_tiny_tiles() {
        let config = GameConfig::new(GameConfig::MERRILL_CLASSROOM, 1e-9, 8, 8, 0.1);

        assert_eq!(config.tile_degrees, GameConfig::MIN_TILE_DEGREES);
        let widest = 180.0 / config.tile_degrees + f64::from(config.neighborhood_size);
        assert!(widest < f64::from(Coord::MAX));
    }

    #[test]
    fn default_matches_sanitized_default() {
        assert_eq!(GameConfig::default(), GameConfig::default().sanitized());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = GameConfig::default();

        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }
}
