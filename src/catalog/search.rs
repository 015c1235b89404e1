use nucleo_matcher::{
    Config, Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};

use super::track::Track;

/// Fuzzy-filters `tracks` against `query`, best match first. Ties keep catalog
/// order. An empty query returns every track in catalog order.
pub fn filter_tracks(tracks: &[Track], query: &str) -> Vec<Track> {
    let query = query.trim();
    if query.is_empty() {
        return tracks.to_vec();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
    let mut buf = Vec::new();

    let mut scored: Vec<(u32, usize)> = tracks
        .iter()
        .enumerate()
        .filter_map(|(i, track)| {
            let haystack = track.search_text();
            pattern
                .score(Utf32Str::new(&haystack, &mut buf), &mut matcher)
                .map(|score| (score, i))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, i)| tracks[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn track(id: &str, title: &str, artist: &str, genre: &str) -> Track {
        Track {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
            album: None,
            duration: Duration::from_secs(180),
            url: format!("https://cdn.example.com/{id}.mp3"),
            thumbnail: "music.png".into(),
            format: Some("mp3".into()),
        }
    }

    fn sample() -> Vec<Track> {
        vec![
            track("1", "Paranoid", "Black Sabbath", "Rock"),
            track("2", "So What", "Miles Davis", "Jazz"),
            track("3", "Windowlicker", "Aphex Twin", "Electronic"),
        ]
    }

    #[test]
    fn empty_query_keeps_catalog_order() {
        let ids: Vec<_> = filter_tracks(&sample(), "  ")
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let found = filter_tracks(&sample(), "so what");
        assert_eq!(found.first().map(|t| t.id.as_str()), Some("2"));
    }

    #[test]
    fn matches_artist_and_genre() {
        assert_eq!(filter_tracks(&sample(), "aphex")[0].id, "3");
        assert_eq!(filter_tracks(&sample(), "jazz")[0].id, "2");
    }

    #[test]
    fn unmatched_query_is_empty() {
        assert!(filter_tracks(&sample(), "qqqq").is_empty());
    }
}
