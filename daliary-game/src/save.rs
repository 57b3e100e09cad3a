//! Day-scoped save envelope and its reversible token transform.
//!
//! The token format (tag prefix, percent-encoding, URL-safe base64) only
//! deters casual edits to the stored payload. It is reversible by anyone
//! and provides no confidentiality or integrity guarantees.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::constants::SAVE_TAG;
use crate::day::DayKey;

/// Characters left intact by the percent step (the URL-safe unreserved set).
const TOKEN_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One day's save: the board snapshot plus the day key that scopes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub day: DayKey,
    pub state: BoardState,
}

/// Encode an envelope into the opaque token stored in the local save slot.
#[must_use]
pub fn encode(envelope: &SaveEnvelope) -> String {
    let Ok(json) = serde_json::to_string(envelope) else {
        return String::new();
    };
    let tagged = format!("{SAVE_TAG}{json}");
    let quoted = utf8_percent_encode(&tagged, TOKEN_SET).to_string();
    URL_SAFE_NO_PAD.encode(quoted.as_bytes())
}

/// Decode a token back into an envelope.
///
/// Malformed input of any kind (bad base64, bad UTF-8, broken percent
/// sequences, missing tag, unparseable payload) yields `None`, never a
/// panic.
#[must_use]
pub fn decode(token: &str) -> Option<SaveEnvelope> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim()).ok()?;
    let quoted = String::from_utf8(bytes).ok()?;
    let tagged = percent_decode_str(&quoted).decode_utf8().ok()?;
    let json = tagged.strip_prefix(SAVE_TAG)?;
    serde_json::from_str(json).ok()
}

/// Apply the load policy to a stored token: only a same-day envelope with
/// at least one tile is restored; anything else counts as absent.
#[must_use]
pub fn load_saved(token: &str, today: &DayKey) -> Option<BoardState> {
    let envelope = decode(token)?;
    if envelope.day != *today || envelope.state.tiles.is_empty() {
        return None;
    }
    Some(envelope.state)
}
