// Library context builder for model consumption
//
// Condenses the user's library into a compact JSON sample embedded in
// generation prompts, capped for prompt-size control.

use serde::Serialize;

use crate::agent::types::LibraryTrack;

/// Max library entries embedded in a prompt
pub const LIBRARY_CONTEXT_CAP: usize = 100;

/// Condensed per-track representation for the model
#[derive(Debug, Serialize)]
struct LibraryContextEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genre: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

/// Serialize up to [`LIBRARY_CONTEXT_CAP`] library tracks as compact JSON.
///
/// An empty library yields an empty string; callers omit the prompt
/// section entirely in that case.
pub fn build_library_context(tracks: &[LibraryTrack]) -> String {
    if tracks.is_empty() {
        return String::new();
    }

    let entries: Vec<LibraryContextEntry<'_>> = tracks
        .iter()
        .take(LIBRARY_CONTEXT_CAP)
        .map(|track| LibraryContextEntry {
            title: track.title.as_deref(),
            artist: track.artist.as_deref(),
            genre: track.genre.as_deref(),
            duration: track.duration.filter(|d| d.is_finite()),
        })
        .collect();

    serde_json::to_string(&entries).unwrap_or_default()
}
