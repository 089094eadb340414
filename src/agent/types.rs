// Data model for the setlist agent
//
// Conversation state is a plain value: the caller passes it in with each
// turn and persists whatever comes back. The agent never stores it.

use serde::{Deserialize, Serialize};

/// Per-conversation state, carried by the caller between turns.
///
/// `Default` is an empty conversation. The resolver copies this at turn
/// start and returns a fresh value; a failed turn returns nothing, so the
/// caller keeps its previous state for the next attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationState {
    /// Prompt parked while we wait for the user's clarification answer
    pub pending_prompt: Option<String>,
    /// True once the one allowed clarifying question has been asked
    pub clarification_asked: bool,
    /// True once the one allowed refinement has been applied to the current setlist
    pub refinement_used: bool,
    /// Most recently produced setlist
    pub last_setlist: Option<Setlist>,
    /// The prompt that produced `last_setlist` (post-clarification if applicable)
    pub original_prompt: Option<String>,
    /// Cached name of the last setlist, reused as a regeneration hint
    pub setlist_name: Option<String>,
    /// Cached genre of the last setlist, reused as a regeneration hint
    pub genre: Option<String>,
}

/// A complete, enriched setlist as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub setlist_name: String,
    #[serde(default)]
    pub genre: String,
    pub tracks: Vec<SetlistTrack>,
    #[serde(default)]
    pub explanation: String,
}

/// Where a track came from: the user's library, or an external suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Library,
    External,
}

/// Full-shape track, produced by library enrichment.
///
/// The minimal model-output shape (`ModelTrack`) never leaves the agent;
/// every track the caller sees has this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetlistTrack {
    pub id: String,
    pub position: u32,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub bpm: Option<f64>,
    pub key: Option<String>,
    /// Seconds, always > 0 for validated setlists
    pub duration: f64,
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub user_id: Option<String>,
    pub source: TrackSource,
    pub library_track_id: Option<String>,
}

/// Minimal track shape the model emits, pre-enrichment
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTrack {
    #[allow(dead_code)]
    pub position: f64,
    pub title: String,
    pub artist: String,
    pub duration: f64,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Setlist shape the model emits, pre-enrichment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSetlist {
    pub setlist_name: String,
    #[serde(default)]
    pub genre: String,
    pub tracks: Vec<ModelTrack>,
    #[serde(default)]
    pub explanation: String,
}

/// Library identifiers come back as strings or numbers depending on the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LibraryId {
    Text(String),
    Numeric(i64),
}

impl LibraryId {
    pub fn as_string(&self) -> String {
        match self {
            LibraryId::Text(s) => s.clone(),
            LibraryId::Numeric(n) => n.to_string(),
        }
    }
}

/// A track from the user's own catalog, read-only to the agent.
///
/// Backends differ in what they store; everything here is optional and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryTrack {
    pub id: Option<LibraryId>,
    pub track_id: Option<LibraryId>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub bpm: Option<f64>,
    pub key: Option<String>,
    pub duration: Option<f64>,
    pub youtube_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl LibraryTrack {
    /// The record's identifier: `id` preferred, `trackId` as fallback
    pub fn identifier(&self) -> Option<String> {
        self.id
            .as_ref()
            .or(self.track_id.as_ref())
            .map(LibraryId::as_string)
    }
}

/// One turn's input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub prompt: String,
    #[serde(default)]
    pub target_duration_minutes: Option<f64>,
    #[serde(default)]
    pub refinement: Option<String>,
    #[serde(default)]
    pub previous_setlist: Option<Setlist>,
    #[serde(default)]
    pub regenerate: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub library_tracks: Option<Vec<LibraryTrack>>,
    #[serde(default)]
    pub state: ConversationState,
}

/// One turn's output: a clarifying question or a finished setlist.
///
/// Failures are the `Err` arm of the turn call, never a variant here.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TurnResult {
    #[serde(rename_all = "camelCase")]
    Clarify {
        question: String,
        state: ConversationState,
    },
    #[serde(rename_all = "camelCase")]
    Setlist {
        setlist: Setlist,
        follow_up: String,
        total_songs: usize,
        total_duration_seconds: f64,
        sources_breakdown: SourcesBreakdown,
        state: ConversationState,
    },
}

/// Per-source track counts for a setlist
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct SourcesBreakdown {
    pub library: usize,
    pub external: usize,
}

/// Aggregate statistics for a setlist
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetlistMeta {
    pub total_songs: usize,
    pub total_duration_seconds: f64,
    pub sources_breakdown: SourcesBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_result_serializes_with_type_tag() {
        let result = TurnResult::Clarify {
            question: "What style or event is this setlist for?".to_string(),
            state: ConversationState::default(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "clarify");
        assert_eq!(json["state"]["clarificationAsked"], false);
    }

    #[test]
    fn library_track_identifier_prefers_id_over_track_id() {
        let track = LibraryTrack {
            id: Some(LibraryId::Numeric(42)),
            track_id: Some(LibraryId::Text("t-1".to_string())),
            ..Default::default()
        };
        assert_eq!(track.identifier(), Some("42".to_string()));

        let track = LibraryTrack {
            track_id: Some(LibraryId::Text("t-1".to_string())),
            ..Default::default()
        };
        assert_eq!(track.identifier(), Some("t-1".to_string()));
    }

    #[test]
    fn library_track_tolerates_unknown_fields() {
        let track: LibraryTrack = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "title": "Joy",
            "artist": "Ada",
            "playCount": 12,
            "waveformPath": "/tmp/x"
        }))
        .unwrap();
        assert_eq!(track.title.as_deref(), Some("Joy"));
        assert_eq!(track.identifier(), Some("abc".to_string()));
    }

    #[test]
    fn conversation_state_round_trips_camel_case() {
        let json = serde_json::json!({
            "pendingPrompt": "something for my event",
            "clarificationAsked": true
        });
        let state: ConversationState = serde_json::from_value(json).unwrap();
        assert!(state.clarification_asked);
        assert!(!state.refinement_used);
        assert_eq!(state.pending_prompt.as_deref(), Some("something for my event"));
    }
}
