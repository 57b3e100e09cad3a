//! Reward eligibility for reaching the target tile, and the payload types
//! exchanged with the score backend.
//!
//! The backend enforces at-most-one-reward-per-day on its side; the gate
//! here is a presentation and bandwidth optimization, not the authority.

use serde::{Deserialize, Serialize};

use crate::constants::GAME_TYPE;
use crate::day::DayKey;

/// What reaching (or not reaching) the target on a move should trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardDecision {
    /// First target tile of the session and no reward granted today yet:
    /// surface the win state and submit with `reached_target = true`.
    GrantReward,
    /// First target tile of the session, but the backend already granted
    /// today's reward: submit with `reached_target = false`, no win state.
    RecordOnly,
    /// Nothing reward-worthy happened on this move.
    NoAction,
}

/// Gate rule: only the move that first produces the target tile in a
/// session is eligible, and only if the remote record says no reward was
/// granted today.
#[must_use]
pub fn evaluate_reward(
    hit_target: bool,
    already_reached: bool,
    last_reward_day: Option<&DayKey>,
    today: &DayKey,
) -> RewardDecision {
    if !hit_target || already_reached {
        return RewardDecision::NoAction;
    }
    if last_reward_day == Some(today) {
        RewardDecision::RecordOnly
    } else {
        RewardDecision::GrantReward
    }
}

/// Payload of the result-recording call. Fire-and-forget from the engine's
/// perspective: its outcome never blocks or rolls back local play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub game_type: String,
    pub score: u32,
    pub reached_target: bool,
}

impl ResultSubmission {
    #[must_use]
    pub fn new(score: u32, reached_target: bool) -> Self {
        Self {
            game_type: GAME_TYPE.to_string(),
            score,
            reached_target,
        }
    }
}

/// Backend acknowledgement of a result submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAck {
    pub reward_given: bool,
}

/// Per-player record the backend keeps for this game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default)]
    pub high_score: u32,
    /// Single source of truth for "was today's reward already granted".
    #[serde(default, rename = "lastRewardDate")]
    pub last_reward_day: Option<DayKey>,
}
