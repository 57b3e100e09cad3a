//! Centralized tuning constants for the 2048 mini-game.
//!
//! Keeping these together ensures the game rules can only be adjusted via
//! code changes reviewed in version control.

// Board geometry -----------------------------------------------------------
/// Board side length in cells.
pub const GRID_SIZE: u8 = 4;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

// Tile rules ---------------------------------------------------------------
/// Tile value that completes the daily challenge.
pub const TARGET_TILE: u32 = 2048;
/// Value of the single injectable hint tile.
pub const HINT_TILE: u32 = 1024;
/// Probability that a spawned tile is a 2 (otherwise a 4).
pub const SPAWN_TWO_CHANCE: f64 = 0.9;
/// Number of tiles on a freshly initialized board.
pub const INITIAL_TILES: usize = 2;

// Persistence --------------------------------------------------------------
/// Fixed key of the local save slot.
pub const SAVE_SLOT_KEY: &str = "daliary.game2048.save";
/// Non-secret tag prefixed to encoded save payloads.
pub(crate) const SAVE_TAG: &str = "DLRY2048.v1|";

// Backend ------------------------------------------------------------------
/// Game type identifier reported to the score backend.
pub const GAME_TYPE: &str = "game2048";
/// UTC offset in hours of the fixed service timezone used for day keys.
pub(crate) const SERVICE_UTC_OFFSET_HOURS: i64 = 9;

// Presentation -------------------------------------------------------------
/// Milliseconds the presentation layer keeps move input locked after an
/// accepted move, so the slide transition can finish.
pub const MOVE_LOCK_MS: u32 = 120;
