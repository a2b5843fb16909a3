pub mod api;
pub mod config;
pub mod export;
pub mod output;
pub mod session;
pub mod timestamp;
pub mod viewer;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata for a single video
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VideoInfo {
    #[serde(alias = "video_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    /// Length in whole seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

/// A single caption cue
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscriptEntry {
    pub text: String,
    #[serde(serialize_with = "serialize_seconds")]
    pub start: f64,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: f64,
}

// Whole seconds are written as integers (`0`, not `0.0`)
fn serialize_seconds<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl TranscriptEntry {
    /// End offset of the cue. Cues may overlap the next one.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Caption track for a video, entries in backend order
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transcript {
    pub video_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub is_generated: bool,
    #[serde(rename = "transcript", alias = "snippets", default)]
    pub entries: Vec<TranscriptEntry>,
}

/// Rejection of user input that names no video
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a YouTube URL or video ID")]
    Empty,

    #[error("Invalid YouTube URL or video ID")]
    Invalid,
}

static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // youtube.com/watch?v=ID, v= may follow other query params
        r"youtube\.com/watch\?(?:[^#]*&)?v=([a-zA-Z0-9_-]{11})",
        // youtu.be/ID
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        // youtube.com/embed/ID
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        // youtube.com/shorts/ID
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
        // Bare 11-character video ID
        r"^([a-zA-Z0-9_-]{11})$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern"))
    .collect()
});

/// Extract video ID from various YouTube URL formats.
///
/// Patterns are tried in order and the first match wins.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

/// Resolve user input to a video ID, with a message fit to show next to the input
pub fn resolve_input(input: &str) -> Result<String, InputError> {
    if input.trim().is_empty() {
        return Err(InputError::Empty);
    }
    extract_video_id(input).ok_or(InputError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("not-a-valid-id"), None);
        assert_eq!(extract_video_id("abc1234567"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_resolve_input_errors() {
        assert_eq!(resolve_input("   "), Err(InputError::Empty));
        assert_eq!(resolve_input("https://vimeo.com/123"), Err(InputError::Invalid));
        assert_eq!(
            resolve_input("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Ok("dQw4w9WgXcQ")
        );
        assert_eq!(InputError::Invalid.to_string(), "Invalid YouTube URL or video ID");
    }

    #[test]
    fn test_transcript_deserialize() {
        let json = r#"{
            "video_id": "dQw4w9WgXcQ",
            "language": "English",
            "language_code": "en",
            "is_generated": true,
            "transcript": [{"text": "Hello", "start": 0.5, "duration": 1.25}]
        }"#;
        let t: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(t.language_code, "en");
        assert!(t.is_generated);
        assert_eq!(t.entries.len(), 1);
        assert!((t.entries[0].end() - 1.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transcript_snippets_alias() {
        let json = r#"{"video_id": "x", "language": "en", "snippets": []}"#;
        let t: Transcript = serde_json::from_str(json).unwrap();
        assert!(t.entries.is_empty());
        assert!(!t.is_generated);
    }

    #[test]
    fn test_video_info_minimal() {
        let json = r#"{"video_id": "dQw4w9WgXcQ", "title": "Never Gonna", "duration": 213}"#;
        let info: VideoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.duration, 213);
        assert!(info.view_count.is_none());
    }
}
