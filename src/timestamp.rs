//! Timestamp strings for the viewer and the subtitle formats.
//!
//! All functions expect a finite, non-negative offset in seconds.

/// Human-readable clock: `M:SS`, or `H:MM:SS` once an hour is reached.
///
/// Fractional seconds are truncated.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// SubRip timestamp: `HH:MM:SS,mmm`
pub fn format_srt(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// WebVTT timestamp: `HH:MM:SS.mmm`
pub fn format_vtt(seconds: f64) -> String {
    let (h, m, s, ms) = split_millis(seconds);
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

// Rounded to the nearest millisecond so 1.001 doesn't come out as 1.000
fn split_millis(seconds: f64) -> (u64, u64, u64, u64) {
    let total_ms = (seconds * 1000.0).round() as u64;
    (
        total_ms / 3_600_000,
        (total_ms % 3_600_000) / 60_000,
        (total_ms % 60_000) / 1000,
        total_ms % 1000,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_boundaries() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.0), "0:59");
        assert_eq!(format_clock(61.0), "1:01");
        assert_eq!(format_clock(3599.0), "59:59");
        assert_eq!(format_clock(3600.0), "1:00:00");
        assert_eq!(format_clock(3661.0), "1:01:01");
    }

    #[test]
    fn test_format_clock_truncates() {
        assert_eq!(format_clock(59.99), "0:59");
        assert_eq!(format_clock(125.5), "2:05");
    }

    #[test]
    fn test_format_clock_long_video() {
        assert_eq!(format_clock(36_000.0 + 62.0), "10:01:02");
    }

    #[test]
    fn test_format_srt() {
        assert_eq!(format_srt(0.0), "00:00:00,000");
        assert_eq!(format_srt(1.5), "00:00:01,500");
        assert_eq!(format_srt(3661.042), "01:01:01,042");
    }

    #[test]
    fn test_format_vtt() {
        assert_eq!(format_vtt(1.5), "00:00:01.500");
        assert_eq!(format_vtt(59.999), "00:00:59.999");
        assert_eq!(format_vtt(7322.25), "02:02:02.250");
    }

    #[test]
    fn test_millis_rounding() {
        assert_eq!(format_srt(1.001), "00:00:01,001");
        assert_eq!(format_srt(2.34 + 0.21), "00:00:02,550");
    }
}
