// Structural validation of model-produced setlist payloads
//
// The model is instructed to always return a usable setlist, so a failure
// here means it did not comply; the turn fails rather than degrading.

use serde_json::Value;

use crate::error::{AgentError, Result};

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;
const MIN_TRACKS: usize = 3;

/// Validate a parsed setlist payload before trusting it.
///
/// Pure check: first violation wins, success returns `()`. Check order is
/// part of the contract (callers rely on the reported reason).
pub fn validate_setlist_payload(payload: &Value) -> Result<()> {
    let obj = payload
        .as_object()
        .ok_or_else(|| AgentError::validation("Invalid setlist payload."))?;

    let name = obj
        .get("setlistName")
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::validation("Setlist must have a setlistName."))?;
    let name_len = name.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
        return Err(AgentError::validation(
            "setlistName must be 3 to 50 characters.",
        ));
    }

    let tracks = obj
        .get("tracks")
        .and_then(Value::as_array)
        .filter(|tracks| !tracks.is_empty())
        .ok_or_else(|| AgentError::validation("Setlist must include at least one track."))?;

    if tracks.len() < MIN_TRACKS {
        return Err(AgentError::validation(
            "Setlist must include at least 3 tracks.",
        ));
    }

    for (i, track) in tracks.iter().enumerate() {
        let position = track.get("position").and_then(Value::as_f64);
        if position != Some((i + 1) as f64) {
            return Err(AgentError::validation("Track positions must be ordered 1..N."));
        }

        if !has_non_empty_string(track, "title") {
            return Err(AgentError::validation("Each track must have a title."));
        }
        if !has_non_empty_string(track, "artist") {
            return Err(AgentError::validation("Each track must have an artist."));
        }

        match track.get("duration").and_then(Value::as_f64) {
            Some(duration) if duration.is_finite() && duration > 0.0 => {}
            _ => {
                return Err(AgentError::validation(
                    "Each track must have a positive duration (seconds).",
                ))
            }
        }

        if let Some(genre) = track.get("genre") {
            if !genre.is_null() && !genre.is_string() {
                return Err(AgentError::validation(
                    "Track genre must be a string when present.",
                ));
            }
        }
    }

    Ok(())
}

fn has_non_empty_string(track: &Value, field: &str) -> bool {
    track
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}
