// Aggregate statistics over a setlist

use super::types::{Setlist, SetlistMeta, SourcesBreakdown, TrackSource};

/// Compute song count, total duration, and per-source breakdown.
///
/// Pure and idempotent; non-finite durations count as zero so one odd
/// track cannot poison the total.
pub fn compute_meta(setlist: &Setlist) -> SetlistMeta {
    let mut breakdown = SourcesBreakdown::default();
    let mut total_duration_seconds = 0.0;

    for track in &setlist.tracks {
        if track.duration.is_finite() {
            total_duration_seconds += track.duration;
        }
        match track.source {
            TrackSource::Library => breakdown.library += 1,
            TrackSource::External => breakdown.external += 1,
        }
    }

    SetlistMeta {
        total_songs: setlist.tracks.len(),
        total_duration_seconds,
        sources_breakdown: breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::library::merge_with_library;
    use crate::agent::types::{LibraryId, LibraryTrack, ModelSetlist, ModelTrack};

    fn sample_setlist() -> Setlist {
        let library = vec![LibraryTrack {
            id: Some(LibraryId::Numeric(1)),
            title: Some("Ye".to_string()),
            artist: Some("Burna Boy".to_string()),
            duration: Some(222.0),
            ..Default::default()
        }];
        let model = ModelSetlist {
            setlist_name: "Lagos Nights".to_string(),
            genre: "Afrobeats".to_string(),
            explanation: String::new(),
            tracks: vec![
                ModelTrack {
                    position: 1.0,
                    title: "Ye".to_string(),
                    artist: "Burna Boy".to_string(),
                    duration: 200.0,
                    genre: None,
                },
                ModelTrack {
                    position: 2.0,
                    title: "Unknown".to_string(),
                    artist: "Someone".to_string(),
                    duration: 178.0,
                    genre: None,
                },
                ModelTrack {
                    position: 3.0,
                    title: "Another".to_string(),
                    artist: "Someone Else".to_string(),
                    duration: 100.0,
                    genre: None,
                },
            ],
        };
        merge_with_library(model, &library, None)
    }

    #[test]
    fn totals_and_breakdown() {
        let meta = compute_meta(&sample_setlist());
        assert_eq!(meta.total_songs, 3);
        assert_eq!(meta.total_duration_seconds, 222.0 + 178.0 + 100.0);
        assert_eq!(meta.sources_breakdown.library, 1);
        assert_eq!(meta.sources_breakdown.external, 2);
    }

    #[test]
    fn breakdown_always_sums_to_total_songs() {
        let meta = compute_meta(&sample_setlist());
        assert_eq!(
            meta.sources_breakdown.library + meta.sources_breakdown.external,
            meta.total_songs
        );
    }

    #[test]
    fn compute_meta_is_idempotent() {
        let setlist = sample_setlist();
        assert_eq!(compute_meta(&setlist), compute_meta(&setlist));
    }

    #[test]
    fn non_finite_duration_counts_as_zero() {
        let mut setlist = sample_setlist();
        setlist.tracks[0].duration = f64::NAN;
        let meta = compute_meta(&setlist);
        assert_eq!(meta.total_duration_seconds, 178.0 + 100.0);
    }
}
