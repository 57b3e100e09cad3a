//! 4x4 board simulation: tile movement, merge resolution, spawning, and
//! terminal-state detection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    CELL_COUNT, GRID_SIZE, HINT_TILE, INITIAL_TILES, SPAWN_TWO_CHANCE, TARGET_TILE,
};

/// Stable identity of a tile.
///
/// A tile keeps its id while it slides; a tile consumed by a merge gives up
/// its id and the surviving tile keeps its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

/// A single numbered tile on the grid. `value` is a positive power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub x: u8,
    pub y: u8,
}

/// A direction to slide the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

/// Complete board snapshot between moves.
///
/// At most one tile occupies a given cell at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BoardState {
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub score: u32,
    /// Sticky once a merge has produced the target tile this session.
    #[serde(default)]
    pub reached_target: bool,
    /// At most one hint tile may be injected per session.
    #[serde(default)]
    pub hint_used: bool,
    /// Next tile id to allocate; persisted so restored games keep ids unique.
    #[serde(default)]
    pub next_id: u32,
}

impl BoardState {
    /// Build a board from a row-major value grid, zero meaning empty.
    /// Ids are assigned row-major; score and flags start cleared.
    #[must_use]
    pub fn from_values(rows: &[[u32; GRID_SIZE as usize]; GRID_SIZE as usize]) -> Self {
        let mut state = Self::default();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value > 0 {
                    let id = state.alloc_id();
                    state.tiles.push(Tile {
                        id,
                        value,
                        x: x as u8,
                        y: y as u8,
                    });
                }
            }
        }
        state
    }

    #[must_use]
    pub fn tile_at(&self, x: u8, y: u8) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.x == x && t.y == y)
    }

    /// Cells not occupied by any tile, in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> SmallVec<[(u8, u8); CELL_COUNT]> {
        let mut occupied = [[false; GRID_SIZE as usize]; GRID_SIZE as usize];
        for tile in &self.tiles {
            occupied[tile.y as usize][tile.x as usize] = true;
        }
        let mut cells = SmallVec::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if !occupied[y as usize][x as usize] {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tiles.len() >= CELL_COUNT
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Sum of all tile values on the board.
    #[must_use]
    pub fn value_sum(&self) -> u64 {
        self.tiles.iter().map(|t| u64::from(t.value)).sum()
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        let empties = self.empty_cells();
        if empties.is_empty() {
            return None;
        }
        let (x, y) = empties[rng.gen_range(0..empties.len())];
        let value = if rng.gen_bool(SPAWN_TWO_CHANCE) { 2 } else { 4 };
        let tile = Tile {
            id: self.alloc_id(),
            value,
            x,
            y,
        };
        self.tiles.push(tile);
        Some(tile)
    }
}

/// Outcome of applying a directional move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub state: BoardState,
    /// Whether any tile shifted or merged. A `false` outcome carries the
    /// input state unchanged and spawned nothing.
    pub moved: bool,
    pub score_gain: u32,
    /// Whether a merge on this move produced the target tile.
    pub hit_target: bool,
}

/// Start a fresh board with the initial random tiles.
#[must_use]
pub fn init_game<R: Rng + ?Sized>(rng: &mut R) -> BoardState {
    let mut state = BoardState::default();
    for _ in 0..INITIAL_TILES {
        state.spawn_random_tile(rng);
    }
    state
}

/// Slide and merge the board in `dir`.
///
/// Each of the four lines perpendicular to the motion is scanned from the
/// moving edge outward. A tile merges into the immediately preceding output
/// tile iff their values are equal and that output tile has not already
/// merged during this move, so a line of four equal tiles collapses to two
/// pairs rather than cascading. The surviving tile keeps its id and doubles.
///
/// Iff anything moved, exactly one tile spawns on a uniformly random empty
/// cell (2 at 90%, 4 at 10%); a board left full after the move spawns
/// nothing. A move that changes nothing is a pure rejection: the returned
/// state is the input state and the RNG is not consumed.
#[must_use]
pub fn apply_move<R: Rng + ?Sized>(
    state: &BoardState,
    dir: Direction,
    rng: &mut R,
) -> MoveOutcome {
    let mut moved = false;
    let mut score_gain = 0u32;
    let mut hit_target = false;
    let mut placed: Vec<Tile> = Vec::with_capacity(state.tiles.len());

    for lane in 0..GRID_SIZE {
        let mut line: SmallVec<[Tile; GRID_SIZE as usize]> = state
            .tiles
            .iter()
            .copied()
            .filter(|t| lane_of(*t, dir) == lane)
            .collect();
        line.sort_by_key(|t| slide_rank(*t, dir));

        let mut out: SmallVec<[Tile; GRID_SIZE as usize]> = SmallVec::new();
        let mut merged: SmallVec<[bool; GRID_SIZE as usize]> = SmallVec::new();
        for tile in line {
            if let Some(idx) = out.len().checked_sub(1) {
                if !merged[idx] && out[idx].value == tile.value {
                    out[idx].value *= 2;
                    merged[idx] = true;
                    score_gain += out[idx].value;
                    if out[idx].value == TARGET_TILE {
                        hit_target = true;
                    }
                    moved = true;
                    continue;
                }
            }
            out.push(tile);
            merged.push(false);
        }

        for (slot, tile) in out.iter_mut().enumerate() {
            let (x, y) = cell_for_slot(dir, lane, slot as u8);
            if tile.x != x || tile.y != y {
                moved = true;
            }
            tile.x = x;
            tile.y = y;
            placed.push(*tile);
        }
    }

    if !moved {
        return MoveOutcome {
            state: state.clone(),
            moved: false,
            score_gain: 0,
            hit_target: false,
        };
    }

    let mut next = state.clone();
    next.tiles = placed;
    next.score += score_gain;
    if hit_target {
        next.reached_target = true;
    }
    next.spawn_random_tile(rng);

    MoveOutcome {
        state: next,
        moved: true,
        score_gain,
        hit_target,
    }
}

/// Why a hint request was rejected. Informational only: the board and the
/// hint-used flag are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HintError {
    #[error("the hint tile was already used this session")]
    AlreadyUsed,
    #[error("no empty cell is available for a hint tile")]
    BoardFull,
}

/// Inject the one-per-session hint tile on a random empty cell.
///
/// # Errors
///
/// Returns an error if the hint was already used or the board is full.
pub fn apply_hint<R: Rng + ?Sized>(
    state: &BoardState,
    rng: &mut R,
) -> Result<BoardState, HintError> {
    if state.hint_used {
        return Err(HintError::AlreadyUsed);
    }
    if state.is_full() {
        return Err(HintError::BoardFull);
    }
    let mut next = state.clone();
    let empties = next.empty_cells();
    let (x, y) = empties[rng.gen_range(0..empties.len())];
    let id = next.alloc_id();
    next.tiles.push(Tile {
        id,
        value: HINT_TILE,
        x,
        y,
    });
    next.hint_used = true;
    Ok(next)
}

/// Whether no further move can change the board.
///
/// Only a full board can be terminal; it is terminal iff no two
/// edge-adjacent tiles share a value. On a full board this coincides with
/// "no direction has a legal move", since without empty cells the only
/// legal change is a merge.
#[must_use]
pub fn is_game_over(state: &BoardState) -> bool {
    if state.tiles.len() < CELL_COUNT {
        return false;
    }
    let mut grid = [[0u32; GRID_SIZE as usize]; GRID_SIZE as usize];
    for tile in &state.tiles {
        grid[tile.y as usize][tile.x as usize] = tile.value;
    }
    for y in 0..GRID_SIZE as usize {
        for x in 0..GRID_SIZE as usize {
            let value = grid[y][x];
            if x + 1 < GRID_SIZE as usize && grid[y][x + 1] == value {
                return false;
            }
            if y + 1 < GRID_SIZE as usize && grid[y + 1][x] == value {
                return false;
            }
        }
    }
    true
}

const fn lane_of(tile: Tile, dir: Direction) -> u8 {
    match dir {
        Direction::Left | Direction::Right => tile.y,
        Direction::Up | Direction::Down => tile.x,
    }
}

const fn slide_rank(tile: Tile, dir: Direction) -> u8 {
    match dir {
        Direction::Left => tile.x,
        Direction::Right => GRID_SIZE - 1 - tile.x,
        Direction::Up => tile.y,
        Direction::Down => GRID_SIZE - 1 - tile.y,
    }
}

const fn cell_for_slot(dir: Direction, lane: u8, slot: u8) -> (u8, u8) {
    match dir {
        Direction::Left => (slot, lane),
        Direction::Right => (GRID_SIZE - 1 - slot, lane),
        Direction::Up => (lane, slot),
        Direction::Down => (lane, GRID_SIZE - 1 - slot),
    }
}
