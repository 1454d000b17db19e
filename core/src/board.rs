use std::collections::BTreeMap;

use crate::*;

/// Canonical registry of every cell referenced so far.
///
/// Cells are interned on first use, the same `(i, j)` always maps to the same [`CellId`] for the lifetime of the
/// board.
#[derive(Clone, Debug)]
pub struct Board {
    tile_width: f64,
    visibility_radius: Coord,
    known_cells: BTreeMap<Cell, CellId>,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(tile_width: f64, visibility_radius: Coord) -> Self {
        Self {
            tile_width,
            visibility_radius: visibility_radius.max(0),
            known_cells: BTreeMap::new(),
            cells: Vec::new(),
        }
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub fn visibility_radius(&self) -> Coord {
        self.visibility_radius
    }

    pub fn known_cells(&self) -> usize {
        self.cells.len()
    }

    /// Interns `cell`, returning its stable handle.
    pub fn cell_id(&mut self, cell: Cell) -> CellId {
        if let Some(&id) = self.known_cells.get(&cell) {
            return id;
        }
        let id = CellId(self.cells.len().try_into().unwrap_or(u32::MAX));
        self.cells.push(cell);
        self.known_cells.insert(cell, id);
        log::trace!("registered cell {} as {:?}", cell, id);
        id
    }

    pub fn cell(&self, id: CellId) -> Cell {
        self.cells[id.index()]
    }

    /// Grid coordinates of the tile containing `point`, without interning it.
    pub fn coords_for_point(&self, point: LatLng) -> Cell {
        Cell::new(
            (point.lat / self.tile_width).floor() as Coord,
            (point.lng / self.tile_width).floor() as Coord,
        )
    }

    pub fn cell_for_point(&mut self, point: LatLng) -> CellId {
        let cell = self.coords_for_point(point);
        self.cell_id(cell)
    }

    pub fn bounds_for_cell(&self, cell: Cell) -> Bounds {
        let w = self.tile_width;
        Bounds {
            min: LatLng::new(f64::from(cell.i) * w, f64::from(cell.j) * w),
            max: LatLng::new(
                f64::from(cell.i.saturating_add(1)) * w,
                f64::from(cell.j.saturating_add(1)) * w,
            ),
        }
    }

    /// Every cell within the visibility radius of the tile containing `point`, row-major.
    pub fn cells_near_point(&mut self, point: LatLng) -> Vec<CellId> {
        let origin = self.coords_for_point(point);
        let radius = self.visibility_radius;
        let side = (2 * radius + 1) as usize;
        let mut result = Vec::with_capacity(side * side);
        for di in -radius..=radius {
            for dj in -radius..=radius {
                result.push(self.cell_id(origin.offset(di, dj)));
            }
        }
        result
    }
}
