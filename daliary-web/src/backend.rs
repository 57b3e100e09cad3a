//! Client for the score backend: result recording and best-score reads.
//!
//! Both calls sit outside the engine. Submissions are fire-and-forget; a
//! failure only means the reward bookkeeping lags until the next sync, and
//! the local board plays on regardless.

use daliary_game::reward::{ResultSubmission, ScoreRecord, SubmitAck};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::dom;

const SUBMIT_URL: &str = "/api/minigame/submit-result";
const BEST_SCORE_URL: &str = "/api/minigame/best-score?gameType=game2048";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend returned status {0}")]
    Status(u16),
}

/// Record a finished-or-won result with the backend.
///
/// # Errors
///
/// Returns an error on network failure, a non-success status, or an
/// unparseable acknowledgement.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn submit_result(submission: &ResultSubmission) -> Result<SubmitAck, BackendError> {
    let body = serde_json::to_string(submission)?;
    let response = dom::post_json(SUBMIT_URL, &body)
        .await
        .map_err(|e| BackendError::Network(dom::js_error_message(&e)))?;
    if !response.ok() {
        return Err(BackendError::Status(response.status()));
    }
    let text = dom::response_text(&response)
        .await
        .map_err(|e| BackendError::Network(dom::js_error_message(&e)))?;
    Ok(serde_json::from_str(&text)?)
}

/// Fetch the player's best-score record for this game type.
///
/// # Errors
///
/// Returns an error on network failure or an unparseable record. A missing
/// record (first play) is `Ok(None)`.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn best_score() -> Result<Option<ScoreRecord>, BackendError> {
    let response = dom::fetch_response(BEST_SCORE_URL)
        .await
        .map_err(|e| BackendError::Network(dom::js_error_message(&e)))?;
    if response.status() == 404 {
        return Ok(None);
    }
    if !response.ok() {
        return Err(BackendError::Status(response.status()));
    }
    let text = dom::response_text(&response)
        .await
        .map_err(|e| BackendError::Network(dom::js_error_message(&e)))?;
    Ok(Some(serde_json::from_str(&text)?))
}

/// Issue a submission without blocking play. Success triggers `on_ack` so
/// the caller can refresh the cached reward status; failure is only logged.
pub fn submit_in_background(submission: ResultSubmission, on_ack: Callback<SubmitAck>) {
    spawn_local(async move {
        match submit_result(&submission).await {
            Ok(ack) => on_ack.emit(ack),
            Err(err) => log::warn!("result submission failed: {err}"),
        }
    });
}
