// Duration fitting for track lists
//
// Keeps required tracks unconditionally, then fills toward the target with
// the remaining tracks in their original order. Single greedy pass: a
// track that would overflow is skipped, later (shorter) tracks may still
// fit. No backtracking or reordering.

use super::types::SetlistTrack;

/// Outcome of a fitting pass
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub tracks: Vec<SetlistTrack>,
    /// True iff the required tracks alone already exceed the target
    pub exceeded: bool,
}

fn total_duration(tracks: &[SetlistTrack]) -> f64 {
    tracks
        .iter()
        .filter(|t| t.duration.is_finite())
        .map(|t| t.duration)
        .sum()
}

/// Fit `tracks` to `target_seconds`, never dropping a required track.
///
/// An absent or non-positive target returns the input unchanged.
pub fn fit_tracks_to_target<F>(
    tracks: Vec<SetlistTrack>,
    target_seconds: Option<f64>,
    required: F,
) -> FitResult
where
    F: Fn(&SetlistTrack) -> bool,
{
    let target = match target_seconds {
        Some(t) if t > 0.0 => t,
        _ => {
            return FitResult {
                tracks,
                exceeded: false,
            }
        }
    };

    let mut kept = Vec::new();
    let mut optional = Vec::new();
    for track in tracks {
        if required(&track) {
            kept.push(track);
        } else {
            optional.push(track);
        }
    }

    let required_duration = total_duration(&kept);
    let mut current = required_duration;

    for track in optional {
        if current + track.duration > target {
            continue;
        }
        current += track.duration;
        kept.push(track);
    }

    FitResult {
        tracks: kept,
        exceeded: required_duration > target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::TrackSource;

    fn track(title: &str, duration: f64, source: TrackSource) -> SetlistTrack {
        SetlistTrack {
            id: title.to_string(),
            position: 0,
            title: title.to_string(),
            artist: "A".to_string(),
            genre: None,
            album: None,
            year: None,
            bpm: None,
            key: None,
            duration,
            youtube_url: None,
            tags: Vec::new(),
            user_id: None,
            source,
            library_track_id: None,
        }
    }

    fn titles(result: &FitResult) -> Vec<&str> {
        result.tracks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn no_target_returns_input_unchanged() {
        let tracks = vec![track("a", 100.0, TrackSource::External)];
        let result = fit_tracks_to_target(tracks.clone(), None, |_| false);
        assert_eq!(result.tracks, tracks);
        assert!(!result.exceeded);

        let result = fit_tracks_to_target(tracks.clone(), Some(0.0), |_| false);
        assert_eq!(result.tracks, tracks);
        assert!(!result.exceeded);
    }

    #[test]
    fn required_tracks_survive_even_over_target() {
        let tracks = vec![
            track("keep1", 400.0, TrackSource::Library),
            track("keep2", 400.0, TrackSource::Library),
            track("opt", 100.0, TrackSource::External),
        ];
        let result =
            fit_tracks_to_target(tracks, Some(300.0), |t| t.source == TrackSource::Library);
        assert_eq!(titles(&result), vec!["keep1", "keep2"]);
        assert!(result.exceeded);
    }

    #[test]
    fn optional_tracks_fill_greedily_in_order() {
        let tracks = vec![
            track("req", 100.0, TrackSource::Library),
            track("opt1", 150.0, TrackSource::External),
            track("opt2", 150.0, TrackSource::External),
            track("opt3", 150.0, TrackSource::External),
        ];
        let result =
            fit_tracks_to_target(tracks, Some(400.0), |t| t.source == TrackSource::Library);
        assert_eq!(titles(&result), vec!["req", "opt1", "opt2"]);
        assert!(!result.exceeded);
    }

    #[test]
    fn overflowing_track_is_skipped_but_later_tracks_still_fit() {
        let tracks = vec![
            track("big", 250.0, TrackSource::External),
            track("small", 50.0, TrackSource::External),
        ];
        let result = fit_tracks_to_target(tracks, Some(200.0), |_| false);
        assert_eq!(titles(&result), vec!["small"]);
        assert!(!result.exceeded);
    }

    #[test]
    fn exact_fit_is_allowed() {
        let tracks = vec![
            track("a", 100.0, TrackSource::External),
            track("b", 100.0, TrackSource::External),
        ];
        let result = fit_tracks_to_target(tracks, Some(200.0), |_| false);
        assert_eq!(titles(&result), vec!["a", "b"]);
    }

    #[test]
    fn relative_order_is_preserved_within_partitions() {
        let tracks = vec![
            track("opt1", 10.0, TrackSource::External),
            track("req1", 10.0, TrackSource::Library),
            track("opt2", 10.0, TrackSource::External),
            track("req2", 10.0, TrackSource::Library),
        ];
        let result =
            fit_tracks_to_target(tracks, Some(1000.0), |t| t.source == TrackSource::Library);
        assert_eq!(titles(&result), vec!["req1", "req2", "opt1", "opt2"]);
    }
}
