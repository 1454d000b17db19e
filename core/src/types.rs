use serde::{Deserialize, Serialize};
use std::fmt;

/// Single grid axis index, tiles extend in both directions from the equator/meridian.
pub type Coord = i32;

/// Continuous map coordinate in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }
}

/// Discrete grid tile `(i, j)`, `i` follows latitude and `j` follows longitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: Coord,
    pub j: Coord,
}

impl Cell {
    pub const fn new(i: Coord, j: Coord) -> Self {
        Self { i, j }
    }

    /// Neighbor at `(di, dj)`, saturating at the edges of the grid.
    pub const fn offset(self, di: Coord, dj: Coord) -> Self {
        Self::new(self.i.saturating_add(di), self.j.saturating_add(dj))
    }

    /// Key used to derive every deterministic draw for this cell, `prefix` may be empty.
    pub fn luck_key(self, prefix: &str) -> String {
        if prefix.is_empty() {
            format!("{},{}", self.i, self.j)
        } else {
            format!("{},{},{}", prefix, self.i, self.j)
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.i, self.j)
    }
}

impl From<(Coord, Coord)> for Cell {
    fn from((i, j): (Coord, Coord)) -> Self {
        Self::new(i, j)
    }
}

/// Stable handle into the board's cell registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub(crate) u32);

impl CellId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Axis-aligned extent of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: LatLng,
    pub max: LatLng,
}

impl Bounds {
    pub fn contains(&self, point: LatLng) -> bool {
        (self.min.lat..self.max.lat).contains(&point.lat)
            && (self.min.lng..self.max.lng).contains(&point.lng)
    }
}

/// One-tile movement command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Tile delta `(di, dj)` for this direction.
    pub const fn delta(self) -> (Coord, Coord) {
        use Direction::*;
        match self {
            North => (1, 0),
            South => (-1, 0),
            East => (0, 1),
            West => (0, -1),
        }
    }

    pub const fn label(self) -> &'static str {
        use Direction::*;
        match self {
            North => "north",
            South => "south",
            East => "east",
            West => "west",
        }
    }
}
