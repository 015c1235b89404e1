use std::time::Duration;

use unicode_width::UnicodeWidthChar;

/// `m:ss`, minutes unbounded.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && exponent < UNITS.len() - 1 {
        value /= 1024.0;
        exponent += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exponent])
}

/// Cuts `text` to `max_width` terminal columns, ending with `…` when cut.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_minutes_and_padded_seconds() {
        assert_eq!(format_duration(Duration::ZERO), "0:00");
        assert_eq!(format_duration(Duration::from_secs_f64(65.9)), "1:05");
        assert_eq!(format_duration(Duration::from_secs(3725)), "62:05");
    }

    #[test]
    fn file_sizes_use_binary_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3_500_000_000), "3.26 GB");
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
        assert_eq!(truncate("日本語の曲", 5), "日本…");
    }
}
