//! Daliary 2048 Engine
//!
//! Platform-agnostic core logic for the 2048 mini-game embedded in the
//! Daliary companion app: board simulation, day-scoped persistence, and
//! reward gating, with no UI or platform-specific dependencies.

pub mod board;
pub mod constants;
pub mod day;
pub mod reward;
pub mod save;
pub mod session;

// Re-export commonly used types
pub use board::{
    BoardState, Direction, HintError, MoveOutcome, Tile, TileId, apply_hint, apply_move,
    init_game, is_game_over,
};
pub use constants::{GAME_TYPE, MOVE_LOCK_MS, SAVE_SLOT_KEY, TARGET_TILE};
pub use day::DayKey;
pub use reward::{ResultSubmission, RewardDecision, ScoreRecord, SubmitAck, evaluate_reward};
pub use save::{SaveEnvelope, decode, encode, load_saved};
pub use session::{GameSession, MoveReport, SaveAction};

/// Trait for the single local save slot.
/// Platform-specific implementations should provide this.
pub trait SaveStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the current token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    fn read(&self) -> Result<Option<String>, Self::Error>;

    /// Overwrite the slot with a new token.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    fn write(&self, token: &str) -> Result<(), Self::Error>;

    /// Delete the slot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be cleared.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Main engine binding the save slot to the session lifecycle.
pub struct GameEngine<S>
where
    S: SaveStore,
{
    store: S,
}

impl<S> GameEngine<S>
where
    S: SaveStore,
{
    /// Create a new engine over the provided save slot.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Start a session for the given day, restoring a valid same-day save
    /// when one exists. An unreadable or invalid slot degrades to a fresh
    /// game; nothing here is fatal.
    pub fn start_session(&self, day: DayKey, seed: u64) -> GameSession {
        let token = self.store.read().ok().flatten();
        GameSession::start_for_day(day, seed, token.as_deref())
    }

    /// Apply a session's save decision to the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written or cleared.
    pub fn apply_save(&self, action: &SaveAction) -> Result<(), S::Error> {
        match action {
            SaveAction::Persist(token) => self.store.write(token),
            SaveAction::Clear => self.store.clear(),
            SaveAction::None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemorySaveStore {
        slot: Rc<RefCell<Option<String>>>,
    }

    impl SaveStore for MemorySaveStore {
        type Error = Infallible;

        fn read(&self) -> Result<Option<String>, Self::Error> {
            Ok(self.slot.borrow().clone())
        }

        fn write(&self, token: &str) -> Result<(), Self::Error> {
            *self.slot.borrow_mut() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<(), Self::Error> {
            *self.slot.borrow_mut() = None;
            Ok(())
        }
    }

    fn day(s: &str) -> DayKey {
        s.parse().expect("valid day")
    }

    #[test]
    fn engine_persists_and_restores_across_sessions() {
        let store = MemorySaveStore::default();
        let engine = GameEngine::new(store.clone());

        let mut session = engine.start_session(day("2026-08-07"), 0xABCD);
        let mut moved_report = None;
        for dir in Direction::ALL {
            let report = session.handle_move(dir);
            if report.moved {
                moved_report = Some(report);
                break;
            }
        }
        let report = moved_report.expect("a fresh board always has a legal move");
        engine.apply_save(&report.save).unwrap();
        assert!(store.slot.borrow().is_some());

        let restored = engine.start_session(day("2026-08-07"), 0xBEEF);
        assert_eq!(restored.state(), session.state());
    }

    #[test]
    fn engine_discards_previous_days_save() {
        let store = MemorySaveStore::default();
        let engine = GameEngine::new(store.clone());

        let mut session = engine.start_session(day("2026-08-06"), 1);
        for dir in Direction::ALL {
            let report = session.handle_move(dir);
            if report.moved {
                engine.apply_save(&report.save).unwrap();
                break;
            }
        }
        assert!(store.slot.borrow().is_some());

        let next_day = engine.start_session(day("2026-08-07"), 2);
        assert_eq!(next_day.state().tiles.len(), 2);
        assert_eq!(next_day.score(), 0);
    }

    #[test]
    fn clear_action_empties_the_slot() {
        let store = MemorySaveStore::default();
        let engine = GameEngine::new(store.clone());
        engine
            .apply_save(&SaveAction::Persist("token".to_string()))
            .unwrap();
        assert!(store.slot.borrow().is_some());
        engine.apply_save(&SaveAction::Clear).unwrap();
        assert!(store.slot.borrow().is_none());
        engine.apply_save(&SaveAction::None).unwrap();
        assert!(store.slot.borrow().is_none());
    }
}
