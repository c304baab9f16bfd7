//! Built-in starter library and library filtering

use crate::types::{Track, TrackId};

const COVER_QUERY: &str = "?auto=compress&cs=tinysrgb&w=300";

/// Tracks a fresh install starts with
///
/// Used as the default for the persisted library when nothing is stored yet.
pub fn sample_library() -> Vec<Track> {
    [
        ("1", "Sunset Dreams", "Aurora Waves", "Electronic Horizons", 245, 1, 1_540_406),
        ("2", "Midnight Jazz", "Cool Cats Collective", "Late Night Sessions", 312, 2, 164_745),
        ("3", "Digital Rain", "Cyber Symphony", "Future Beats", 198, 3, 1_105_666),
        ("4", "Ocean Breeze", "Coastal Vibes", "Summer Waves", 267, 4, 189_349),
        ("5", "Urban Pulse", "City Lights", "Street Symphony", 289, 5, 1_190_298),
    ]
    .into_iter()
    .map(|(id, title, artist, album, duration, song, photo)| {
        Track::new(
            TrackId::new(id),
            title,
            artist,
            album,
            duration,
            format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{song}.mp3"),
        )
        .with_cover(format!(
            "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg{COVER_QUERY}"
        ))
    })
    .collect()
}

/// Filter tracks by a case-insensitive search term
///
/// Matches title, artist or album. A blank term returns every track, in
/// library order.
pub fn filter_tracks<'a>(tracks: &'a [Track], term: &str) -> Vec<&'a Track> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return tracks.iter().collect();
    }
    tracks.iter().filter(|t| t.matches_lowercase(&term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_library_has_unique_ids() {
        let tracks = sample_library();
        assert_eq!(tracks.len(), 5);

        let ids: HashSet<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), tracks.len());
        assert!(tracks.iter().all(|t| t.cover.is_some()));
    }

    #[test]
    fn filter_blank_returns_all() {
        let tracks = sample_library();
        assert_eq!(filter_tracks(&tracks, "").len(), 5);
        assert_eq!(filter_tracks(&tracks, "   ").len(), 5);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let tracks = sample_library();

        let by_title = filter_tracks(&tracks, "JAZZ");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id.as_str(), "2");

        // "Symphony" appears as an artist (Cyber Symphony) and an album (Street Symphony)
        let ids: Vec<&str> = filter_tracks(&tracks, "symphony")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "5"]);
    }

    #[test]
    fn filter_without_match_is_empty() {
        let tracks = sample_library();
        assert!(filter_tracks(&tracks, "polka").is_empty());
    }
}
