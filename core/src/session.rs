use std::collections::{BTreeMap, BTreeSet};

use crate::*;

/// Visual changes a regeneration asks the renderer to apply, despawns first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegenerateOutcome {
    pub spawned: Vec<Cell>,
    pub despawned: Vec<Cell>,
}

impl RegenerateOutcome {
    pub fn has_update(&self) -> bool {
        !self.spawned.is_empty() || !self.despawned.is_empty()
    }
}

/// Cells of the half-open regeneration window `[c - n, c + n)` on both axes around `center`, row-major.
pub fn window_cells(center: Cell, half_width: Coord) -> impl Iterator<Item = Cell> {
    (-half_width..half_width)
        .flat_map(move |di| (-half_width..half_width).map(move |dj| center.offset(di, dj)))
}

/// Single owner of the game: config, board registry, persisted state, the caches currently on screen and the store
/// they are saved to.
#[derive(Debug)]
pub struct Session<S> {
    config: GameConfig,
    board: Board,
    state: GameState,
    visible: BTreeMap<Cell, Geocache>,
    store: S,
}

impl<S: RecordStore> Session<S> {
    /// Restores the saved state from `store` (or starts fresh) and spawns the caches around the player.
    pub fn load(config: GameConfig, store: S) -> Self {
        let state = load_or_else(&store, || GameState::default_at(config.origin));
        Self::with_state(config, store, state)
    }

    pub fn with_state(config: GameConfig, store: S, state: GameState) -> Self {
        let mut session = Self {
            board: Board::new(config.tile_degrees, config.visibility_radius),
            config,
            state,
            visible: BTreeMap::new(),
            store,
        };
        let outcome = session.regenerate();
        log::debug!(
            "session started at {:?} with {} visible caches",
            session.state.player,
            outcome.spawned.len()
        );
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player_cell(&self) -> Cell {
        self.board.coords_for_point(self.state.player)
    }

    pub fn bounds_for_cell(&self, cell: Cell) -> Bounds {
        self.board.bounds_for_cell(cell)
    }

    pub fn cache_at(&self, cell: Cell) -> Option<&Geocache> {
        self.visible.get(&cell)
    }

    pub fn visible_caches(&self) -> impl Iterator<Item = &Geocache> {
        self.visible.values()
    }

    pub fn status_text(&self) -> String {
        match self.state.coins.len() {
            0 => "No geocoins yet...".to_string(),
            count => format!("Geocoins: {}", count),
        }
    }

    /// Whether the spawn test passes for `cell`.
    pub fn spawns_at(&self, cell: Cell) -> bool {
        luck(&cell.luck_key("")) < self.config.spawn_probability
    }

    /// Brings the visible caches in line with the window around the player.
    pub fn regenerate(&mut self) -> RegenerateOutcome {
        let center_id = self.board.cell_for_point(self.state.player);
        let center = self.board.cell(center_id);
        let wanted: BTreeSet<Cell> = window_cells(center, self.config.neighborhood_size)
            .filter(|&cell| self.spawns_at(cell))
            .collect();

        let despawned: Vec<Cell> = self
            .visible
            .keys()
            .filter(|cell| !wanted.contains(cell))
            .copied()
            .collect();
        for cell in &despawned {
            self.visible.remove(cell);
        }

        let mut spawned = Vec::new();
        for cell in wanted {
            if self.visible.contains_key(&cell) {
                continue;
            }
            let cache = self.spawn_cache(cell);
            self.visible.insert(cell, cache);
            spawned.push(cell);
        }

        log::trace!(
            "regenerated around {} ({:?}): {} spawned, {} despawned",
            center,
            center_id,
            spawned.len(),
            despawned.len()
        );
        RegenerateOutcome { spawned, despawned }
    }

    fn spawn_cache(&mut self, cell: Cell) -> Geocache {
        let max_coins = self.config.max_initial_coins;
        let cache = match self.state.memento(cell) {
            Some(memento) => Geocache::restore(cell, max_coins, memento)
                .unwrap_or_else(|_| Geocache::new(cell, max_coins)),
            None => Geocache::new(cell, max_coins),
        };
        self.state.record_memento(&cache);
        cache
    }

    fn relocate(&mut self, point: LatLng) -> RegenerateOutcome {
        if self.state.trail.is_empty() {
            self.state.trail.push(self.state.player);
        }
        self.state.player = point;
        self.state.trail.push(point);
        self.regenerate()
    }

    /// Moves the player exactly one tile in `direction`.
    pub fn move_by(&mut self, direction: Direction) -> RegenerateOutcome {
        let (di, dj) = direction.delta();
        let w = self.config.tile_degrees;
        let point = self
            .state
            .player
            .offset(f64::from(di) * w, f64::from(dj) * w);
        log::debug!("move {}: {:?}", direction.label(), point);
        self.relocate(point)
    }

    /// Replaces the player position with a reported geolocation.
    pub fn follow_sensor(&mut self, point: LatLng) -> RegenerateOutcome {
        log::debug!("sensor position: {:?}", point);
        self.relocate(point)
    }

    pub fn take_coin(&mut self, cell: Cell) -> Result<TransferOutcome> {
        let cache = self
            .visible
            .get_mut(&cell)
            .ok_or(GameError::CacheNotVisible)?;
        match cache.take_coin() {
            Ok(coin) => {
                log::debug!("took {} from {}", coin, cell);
                self.state.coins.push(coin);
                self.state.record_memento(cache);
                Ok(TransferOutcome::Transferred)
            }
            Err(GameError::EmptyCache) => Ok(TransferOutcome::NoChange),
            Err(err) => Err(err),
        }
    }

    pub fn deposit_coin(&mut self, cell: Cell) -> Result<TransferOutcome> {
        let cache = self
            .visible
            .get_mut(&cell)
            .ok_or(GameError::CacheNotVisible)?;
        let Some(coin) = self.state.coins.pop() else {
            return Ok(TransferOutcome::NoChange);
        };
        log::debug!("deposited {} into {}", coin, cell);
        cache.deposit_coin(coin);
        self.state.record_memento(cache);
        Ok(TransferOutcome::Transferred)
    }

    /// Wipes inventory, caches and trail and returns the player to the origin. Cannot be undone.
    pub fn reset(&mut self) -> RegenerateOutcome {
        log::debug!("resetting game state");
        let mut despawned: Vec<Cell> = self.visible.keys().copied().collect();
        self.visible.clear();
        self.state.reset(self.config.origin);
        let mut outcome = self.regenerate();
        despawned.append(&mut outcome.despawned);
        outcome.despawned = despawned;
        outcome
    }

    pub fn save(&mut self) -> Result<()> {
        save_value(&mut self.store, &self.state)
    }
}
