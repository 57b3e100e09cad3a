//! Session pipeline binding one calendar day's board to the save slot and
//! the reward gate: input -> move -> persistence decision -> reward
//! decision.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::board::{self, BoardState, Direction, HintError};
use crate::day::DayKey;
use crate::reward::{self, ResultSubmission, RewardDecision};
use crate::save::{self, SaveEnvelope};

/// What the caller should do with the local save slot after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAction {
    /// Write this token to the slot.
    Persist(String),
    /// Delete the slot contents.
    Clear,
    /// Leave the slot untouched.
    None,
}

/// Everything a single move produced.
///
/// `submissions` are fire-and-forget: the I/O layer issues them without
/// awaiting, and a failure never rolls back the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: bool,
    pub score_gain: u32,
    pub reward: RewardDecision,
    pub game_over: bool,
    pub save: SaveAction,
    pub submissions: Vec<ResultSubmission>,
}

impl MoveReport {
    const fn rejected(game_over: bool) -> Self {
        Self {
            moved: false,
            score_gain: 0,
            reward: RewardDecision::NoAction,
            game_over,
            save: SaveAction::None,
            submissions: Vec::new(),
        }
    }
}

/// A live game bound to one calendar day.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: BoardState,
    day: DayKey,
    /// Externally-cached reward status; refreshed after backend syncs.
    last_reward_day: Option<DayKey>,
    game_over: bool,
    rng: ChaCha20Rng,
}

impl GameSession {
    /// Restore the day's save if it is still valid, otherwise start fresh.
    #[must_use]
    pub fn start_for_day(day: DayKey, seed: u64, saved_token: Option<&str>) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = saved_token
            .and_then(|token| save::load_saved(token, &day))
            .unwrap_or_else(|| board::init_game(&mut rng));
        let game_over = board::is_game_over(&state);
        Self {
            state,
            day,
            last_reward_day: None,
            game_over,
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    #[must_use]
    pub fn day(&self) -> &DayKey {
        &self.day
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Refresh the cached "already rewarded today" fact from the backend
    /// record. Never mutates the board.
    pub fn set_last_reward_day(&mut self, day: Option<DayKey>) {
        self.last_reward_day = day;
    }

    /// Apply a directional move and run the full pipeline.
    ///
    /// A move that changes nothing (or arrives after game over) is a pure
    /// rejection: no state change, no save, no submission.
    pub fn handle_move(&mut self, dir: Direction) -> MoveReport {
        if self.game_over {
            return MoveReport::rejected(true);
        }
        let outcome = board::apply_move(&self.state, dir, &mut self.rng);
        if !outcome.moved {
            return MoveReport::rejected(false);
        }

        let decision = reward::evaluate_reward(
            outcome.hit_target,
            self.state.reached_target,
            self.last_reward_day.as_ref(),
            &self.day,
        );
        self.state = outcome.state;
        let game_over = board::is_game_over(&self.state);
        self.game_over = game_over;

        let mut submissions = Vec::new();
        match decision {
            RewardDecision::GrantReward => {
                submissions.push(ResultSubmission::new(self.state.score, true));
            }
            RewardDecision::RecordOnly => {
                submissions.push(ResultSubmission::new(self.state.score, false));
            }
            RewardDecision::NoAction => {}
        }
        if game_over {
            submissions.push(ResultSubmission::new(
                self.state.score,
                self.state.reached_target,
            ));
        }

        let save = if game_over {
            SaveAction::Clear
        } else {
            SaveAction::Persist(self.save_token())
        };

        MoveReport {
            moved: true,
            score_gain: outcome.score_gain,
            reward: decision,
            game_over,
            save,
            submissions,
        }
    }

    /// Inject the one-per-session hint tile and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the hint was already used or no empty cell
    /// exists; the board and the hint flag are left untouched.
    pub fn use_hint(&mut self) -> Result<SaveAction, HintError> {
        let next = board::apply_hint(&self.state, &mut self.rng)?;
        self.state = next;
        Ok(SaveAction::Persist(self.save_token()))
    }

    /// Abandon the current board and start a fresh game for the same day.
    /// The save slot is cleared; the next accepted move persists again.
    pub fn restart(&mut self) -> SaveAction {
        self.state = board::init_game(&mut self.rng);
        self.game_over = false;
        SaveAction::Clear
    }

    fn save_token(&self) -> String {
        save::encode(&SaveEnvelope {
            day: self.day.clone(),
            state: self.state.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::save;

    fn day(s: &str) -> DayKey {
        s.parse().expect("valid day")
    }

    fn session_with_state(state: BoardState) -> GameSession {
        let mut session = GameSession::start_for_day(day("2026-08-07"), 1, None);
        session.game_over = board::is_game_over(&state);
        session.state = state;
        session
    }

    #[test]
    fn fresh_session_starts_with_two_tiles() {
        let session = GameSession::start_for_day(day("2026-08-07"), 42, None);
        assert_eq!(session.state().tiles.len(), 2);
        assert!(!session.is_game_over());
    }

    fn first_accepted_move(session: &mut GameSession) -> MoveReport {
        for dir in crate::board::Direction::ALL {
            let report = session.handle_move(dir);
            if report.moved {
                return report;
            }
        }
        panic!("a fresh board always has a legal move");
    }

    #[test]
    fn same_day_token_restores_board() {
        let today = day("2026-08-07");
        let mut first = GameSession::start_for_day(today.clone(), 42, None);
        let report = first_accepted_move(&mut first);
        let SaveAction::Persist(token) = report.save else {
            panic!("accepted move should persist");
        };
        let restored = GameSession::start_for_day(today, 43, Some(&token));
        assert_eq!(restored.state(), first.state());
    }

    #[test]
    fn stale_token_starts_fresh() {
        let mut yesterday_game = GameSession::start_for_day(day("2026-08-06"), 42, None);
        let report = first_accepted_move(&mut yesterday_game);
        let SaveAction::Persist(token) = report.save else {
            panic!("accepted move should persist");
        };
        let today_game = GameSession::start_for_day(day("2026-08-07"), 42, Some(&token));
        assert_eq!(today_game.state().tiles.len(), 2);
        assert_eq!(today_game.score(), 0);
    }

    #[test]
    fn rejected_move_produces_no_side_effects() {
        let state = BoardState::from_values(&[
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut session = session_with_state(state.clone());
        let report = session.handle_move(Direction::Left);
        assert!(!report.moved);
        assert_eq!(report.save, SaveAction::None);
        assert!(report.submissions.is_empty());
        assert_eq!(session.state(), &state);
    }

    #[test]
    fn first_target_merge_grants_and_submits() {
        let state = BoardState::from_values(&[
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 4, 2, 4],
        ]);
        let mut session = session_with_state(state);
        let report = session.handle_move(Direction::Left);
        assert!(report.moved);
        assert_eq!(report.reward, RewardDecision::GrantReward);
        assert!(session.state().reached_target);
        assert_eq!(report.submissions.len(), 1);
        assert!(report.submissions[0].reached_target);
    }

    #[test]
    fn target_merge_after_todays_reward_records_without_win() {
        let today = day("2026-08-07");
        let state = BoardState::from_values(&[
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 4, 2, 4],
        ]);
        let mut session = session_with_state(state);
        session.set_last_reward_day(Some(today));
        let report = session.handle_move(Direction::Left);
        assert_eq!(report.reward, RewardDecision::RecordOnly);
        assert!(session.state().reached_target);
        assert_eq!(report.submissions.len(), 1);
        assert!(!report.submissions[0].reached_target);
    }

    #[test]
    fn second_target_merge_is_not_rewarded_again() {
        let state = BoardState::from_values(&[
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 4, 2, 4],
        ]);
        let mut already = state;
        already.reached_target = true;
        let mut session = session_with_state(already);
        let report = session.handle_move(Direction::Left);
        assert_eq!(report.reward, RewardDecision::NoAction);
        assert!(report.submissions.is_empty());
    }

    #[test]
    fn game_over_clears_save_and_reports_cumulative_flag() {
        // Sliding Left leaves a single empty cell at (3, 0), so the spawn
        // lands there; neither a 2 nor a 4 can pair with its neighbors, so
        // the move ends the game whatever the RNG does.
        let near_death = BoardState::from_values(&[
            [0, 8, 16, 32],
            [64, 128, 256, 512],
            [8, 16, 32, 64],
            [128, 256, 512, 1024],
        ]);
        let mut session = session_with_state(near_death);
        let report = session.handle_move(Direction::Left);
        assert!(report.moved);
        assert!(report.game_over);
        assert!(session.is_game_over());
        assert_eq!(report.save, SaveAction::Clear);
        assert_eq!(report.submissions.len(), 1);
        assert!(!report.submissions[0].reached_target);
    }

    #[test]
    fn moves_after_game_over_are_ignored() {
        let dead = BoardState::from_values(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        let mut session = session_with_state(dead.clone());
        assert!(session.is_game_over());
        let report = session.handle_move(Direction::Left);
        assert!(!report.moved);
        assert!(report.game_over);
        assert_eq!(session.state(), &dead);
    }

    #[test]
    fn hint_persists_and_is_single_use() {
        let mut session = GameSession::start_for_day(day("2026-08-07"), 9, None);
        let action = session.use_hint().expect("hint succeeds");
        let SaveAction::Persist(token) = action else {
            panic!("hint should persist");
        };
        let envelope = save::decode(&token).expect("token decodes");
        assert!(envelope.state.hint_used);
        assert_eq!(session.use_hint(), Err(HintError::AlreadyUsed));
    }

    #[test]
    fn restart_clears_slot_and_resets_flags() {
        let dead = BoardState::from_values(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        let mut session = session_with_state(dead);
        assert_eq!(session.restart(), SaveAction::Clear);
        assert!(!session.is_game_over());
        assert_eq!(session.state().tiles.len(), 2);
        assert_eq!(session.score(), 0);
        assert!(!session.state().reached_target);
        assert!(!session.state().hint_used);
    }
}
