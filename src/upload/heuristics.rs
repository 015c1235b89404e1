//! Filename-based guesses for title, artist and genre.

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

const GENRES: &[&str] = &[
    "rock",
    "pop",
    "jazz",
    "classical",
    "electronic",
    "hip-hop",
    "country",
    "blues",
];

/// Filename without its extension, separators turned into single spaces.
pub fn title_from_filename(filename: &str) -> String {
    strip_extension(filename)
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"Artist - Song.ext"` or `"Artist_Song.ext"`. The first pattern that
/// matches decides, even when its artist is blank.
pub fn artist_from_filename(filename: &str) -> Option<String> {
    let artist = ['-', '_']
        .into_iter()
        .find_map(|sep| artist_before(filename, sep))?
        .trim();
    (!artist.is_empty()).then(|| artist.to_string())
}

pub fn genre_from_filename(filename: &str) -> Option<String> {
    let lower = filename.to_lowercase();
    GENRES
        .iter()
        .find(|genre| lower.contains(*genre))
        .map(|genre| capitalize(genre))
}

/// Lowercase text after the last dot, or the whole name when there is none.
pub fn format_from_filename(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_lowercase()
}

fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() && !filename[idx + 1..].contains('/') => {
            &filename[..idx]
        }
        _ => filename,
    }
}

/// Untrimmed text before the first `sep`, when the name has that shape.
fn artist_before(filename: &str, sep: char) -> Option<&str> {
    let (head, rest) = filename.split_once(sep)?;
    if head.is_empty() {
        return None;
    }
    let segment = rest.split(sep).next().unwrap_or(rest);
    // the part after the separator needs at least one character before an extension dot
    let has_extension = segment.char_indices().any(|(i, c)| c == '.' && i > 0);
    has_extension.then_some(head)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_from_dash_pattern_is_trimmed() {
        assert_eq!(
            artist_from_filename("Artist - Song.mp3").as_deref(),
            Some("Artist")
        );
    }

    #[test]
    fn artist_from_underscore_pattern() {
        assert_eq!(
            artist_from_filename("Daft Punk_Around the World.flac").as_deref(),
            Some("Daft Punk")
        );
    }

    #[test]
    fn artist_needs_a_single_remaining_segment() {
        assert_eq!(artist_from_filename("my_rock_track.wav"), None);
        assert_eq!(artist_from_filename("A - B - C.mp3"), None);
        assert_eq!(artist_from_filename("NoSeparators.mp3"), None);
        assert_eq!(artist_from_filename(" - Song.mp3"), None);
    }

    #[test]
    fn blank_dash_artist_does_not_fall_back_to_underscore() {
        assert_eq!(artist_from_filename(" - my_song.mp3"), None);
        // no text before the dash at all: the dash pattern does not apply
        assert_eq!(
            artist_from_filename("-Band_Song.mp3").as_deref(),
            Some("-Band")
        );
    }

    #[test]
    fn genre_keyword_is_capitalized() {
        assert_eq!(genre_from_filename("my_rock_track.wav").as_deref(), Some("Rock"));
        assert_eq!(
            genre_from_filename("Best HIP-HOP mix.mp3").as_deref(),
            Some("Hip-hop")
        );
        assert_eq!(genre_from_filename("ambient.mp3"), None);
    }

    #[test]
    fn genre_uses_vocabulary_order() {
        // "rock" is checked before "pop"
        assert_eq!(genre_from_filename("pop_rock.mp3").as_deref(), Some("Rock"));
    }

    #[test]
    fn title_replaces_separators() {
        assert_eq!(title_from_filename("Artist - Song.mp3"), "Artist Song");
        assert_eq!(title_from_filename("my_rock_track.wav"), "my rock track");
        assert_eq!(title_from_filename("no_extension"), "no extension");
        assert_eq!(title_from_filename("v1.2_live.ogg"), "v1.2 live");
    }

    #[test]
    fn format_is_lowercase_extension() {
        assert_eq!(format_from_filename("Song.FLAC"), "flac");
        assert_eq!(format_from_filename("README"), "readme");
    }
}
