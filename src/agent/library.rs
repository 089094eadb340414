// Library matching and track enrichment
//
// Generated tracks are matched against the user's library by normalized
// (title, artist) key. A hit takes the library record's metadata; a miss
// becomes an external suggestion. Matching is exact-key only, case- and
// whitespace-insensitive.

use std::collections::HashMap;

use uuid::Uuid;

use super::types::{LibraryTrack, ModelSetlist, Setlist, SetlistTrack, TrackSource};

/// Lowercase, trim, and collapse internal whitespace runs to one space.
pub fn normalize_key_part(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match key for a (title, artist) pair.
pub fn track_key(title: &str, artist: &str) -> String {
    format!("{}::{}", normalize_key_part(title), normalize_key_part(artist))
}

/// Index over a user's library, keyed by normalized (title, artist).
pub struct LibraryIndex<'a> {
    by_key: HashMap<String, &'a LibraryTrack>,
}

impl<'a> LibraryIndex<'a> {
    pub fn build(tracks: &'a [LibraryTrack]) -> Self {
        let mut by_key = HashMap::new();
        for track in tracks {
            if let (Some(title), Some(artist)) = (track.title.as_deref(), track.artist.as_deref())
            {
                by_key.insert(track_key(title, artist), track);
            }
        }
        Self { by_key }
    }

    pub fn lookup(&self, title: &str, artist: &str) -> Option<&'a LibraryTrack> {
        self.by_key.get(&track_key(title, artist)).copied()
    }
}

/// All inputs to the full track shape, with the optional ones defaulted.
/// Keeping the defaulting rules here, in one constructor, is deliberate.
#[derive(Default)]
struct FullTrackParts {
    id: Option<String>,
    title: String,
    artist: String,
    genre: Option<String>,
    album: Option<String>,
    year: Option<i32>,
    bpm: Option<f64>,
    key: Option<String>,
    duration: f64,
    youtube_url: Option<String>,
    tags: Option<Vec<String>>,
    user_id: Option<String>,
    library_track_id: Option<String>,
}

/// Build a full-shape track at a given 1-based position.
///
/// A missing id gets a fresh UUID; a library-provided id always wins.
fn as_full_track_shape(position: u32, source: TrackSource, parts: FullTrackParts) -> SetlistTrack {
    SetlistTrack {
        id: parts
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        position,
        title: parts.title,
        artist: parts.artist,
        genre: parts.genre,
        album: parts.album,
        year: parts.year,
        bpm: parts.bpm,
        key: parts.key,
        duration: parts.duration,
        youtube_url: parts.youtube_url,
        tags: parts.tags.unwrap_or_default(),
        user_id: parts.user_id,
        source,
        library_track_id: parts.library_track_id,
    }
}

/// Merge a validated model setlist with the user's library.
///
/// Positions are renumbered 1..N in model order, so the contiguity
/// invariant holds by construction.
pub fn merge_with_library(
    model: ModelSetlist,
    library: &[LibraryTrack],
    user_id: Option<&str>,
) -> Setlist {
    let index = LibraryIndex::build(library);

    let tracks = model
        .tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| {
            let position = (i + 1) as u32;
            match index.lookup(&track.title, &track.artist) {
                Some(record) => {
                    // Library record is authoritative; the model's duration
                    // only survives when the library has no usable one.
                    let duration = record
                        .duration
                        .filter(|d| d.is_finite() && *d > 0.0)
                        .unwrap_or(track.duration);
                    as_full_track_shape(
                        position,
                        TrackSource::Library,
                        FullTrackParts {
                            id: record.identifier(),
                            title: record.title.clone().unwrap_or(track.title),
                            artist: record.artist.clone().unwrap_or(track.artist),
                            genre: record.genre.clone().or(track.genre),
                            album: record.album.clone(),
                            year: record.year,
                            bpm: record.bpm,
                            key: record.key.clone(),
                            duration,
                            youtube_url: record.youtube_url.clone(),
                            tags: record.tags.clone(),
                            user_id: user_id.map(str::to_string),
                            library_track_id: record.identifier(),
                        },
                    )
                }
                None => as_full_track_shape(
                    position,
                    TrackSource::External,
                    FullTrackParts {
                        title: track.title,
                        artist: track.artist,
                        genre: track.genre,
                        duration: track.duration,
                        user_id: user_id.map(str::to_string),
                        ..Default::default()
                    },
                ),
            }
        })
        .collect();

    Setlist {
        setlist_name: model.setlist_name,
        genre: model.genre,
        tracks,
        explanation: model.explanation,
    }
}
