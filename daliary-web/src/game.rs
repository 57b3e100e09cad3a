//! Web-specific engine wiring.
//!
//! Provides the localStorage-backed implementation of the core save-slot
//! trait and re-exports the engine types the UI consumes.

use gloo::storage::{LocalStorage, Storage};

// Re-export all types from daliary-game
pub use daliary_game::*;

/// Web-specific save slot backed by localStorage under the fixed key.
pub struct WebSaveStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("storage error: {0}")]
    Storage(String),
}

impl SaveStore for WebSaveStore {
    type Error = WebStorageError;

    fn read(&self) -> Result<Option<String>, Self::Error> {
        match LocalStorage::get::<String>(SAVE_SLOT_KEY) {
            Ok(token) => Ok(Some(token)),
            Err(_) => Ok(None), // No save found
        }
    }

    fn write(&self, token: &str) -> Result<(), Self::Error> {
        LocalStorage::set(SAVE_SLOT_KEY, token)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }

    fn clear(&self) -> Result<(), Self::Error> {
        LocalStorage::delete(SAVE_SLOT_KEY);
        Ok(())
    }
}

/// Create a web-compatible game engine over [`WebSaveStore`].
#[must_use]
pub fn create_web_engine() -> GameEngine<WebSaveStore> {
    GameEngine::new(WebSaveStore)
}

/// Seed material for a fresh session's RNG, mixed from the clock and the
/// browser's PRNG.
#[must_use]
pub fn entropy_seed() -> u64 {
    let millis = js_sys::Date::now() as u64;
    millis ^ js_sys::Math::random().to_bits()
}
