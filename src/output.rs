use serde::{Deserialize, Serialize};

use crate::TranscriptEntry;
use crate::timestamp::{format_clock, format_srt, format_vtt};

const VTT_HEADER: &str = "WEBVTT\n\n";

/// Serialized representation of a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
    Srt,
    Vtt,
}

impl OutputFormat {
    /// Name used on the wire (`format=` query parameter)
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
        }
    }

    /// Structured formats are always encoded locally from the cached entries
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain",
            OutputFormat::Srt => "application/x-subrip",
            OutputFormat::Vtt => "text/vtt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode entries in the requested format
pub fn render(entries: &[TranscriptEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(entries),
        OutputFormat::Text => render_text(entries),
        OutputFormat::Srt => render_srt(entries),
        OutputFormat::Vtt => render_vtt(entries),
    }
}

/// Render entries as a pretty-printed JSON array
pub fn render_json(entries: &[TranscriptEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}

/// Render entries as plain text, one `[M:SS] text` line per cue
pub fn render_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[{}] {}", format_clock(e.start), e.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render entries as SubRip. Cue numbers follow input position.
pub fn render_srt(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_srt(e.start),
                format_srt(e.end()),
                e.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render entries as WebVTT (unnumbered cues)
pub fn render_vtt(entries: &[TranscriptEntry]) -> String {
    let cues = entries
        .iter()
        .map(|e| format!("{} --> {}\n{}\n", format_vtt(e.start), format_vtt(e.end()), e.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{VTT_HEADER}{cues}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, start: f64, duration: f64) -> TranscriptEntry {
        TranscriptEntry {
            text: text.to_string(),
            start,
            duration,
        }
    }

    fn sample_entries() -> Vec<TranscriptEntry> {
        vec![entry("Hello world", 0.0, 1.5), entry("This is a test", 1.5, 2.0)]
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&sample_entries()),
            "[0:00] Hello world\n[0:01] This is a test"
        );
    }

    #[test]
    fn test_render_srt() {
        let expected = "1\n00:00:00,000 --> 00:00:01,500\nHello world\n\n\
                        2\n00:00:01,500 --> 00:00:03,500\nThis is a test\n";
        assert_eq!(render_srt(&sample_entries()), expected);
    }

    #[test]
    fn test_render_vtt() {
        let expected = "WEBVTT\n\n\
                        00:00:00.000 --> 00:00:01.500\nHello world\n\n\
                        00:00:01.500 --> 00:00:03.500\nThis is a test\n";
        assert_eq!(render_vtt(&sample_entries()), expected);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[entry("Hi", 0.5, 1.25)]);
        assert_eq!(
            json,
            "[\n  {\n    \"text\": \"Hi\",\n    \"start\": 0.5,\n    \"duration\": 1.25\n  }\n]"
        );
        let back: Vec<TranscriptEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![entry("Hi", 0.5, 1.25)]);
    }

    #[test]
    fn test_render_json_keeps_whole_seconds() {
        let input = "[\n  {\n    \"text\": \"a\",\n    \"start\": 0,\n    \"duration\": 2\n  }\n]";
        let entries: Vec<TranscriptEntry> = serde_json::from_str(input).unwrap();
        assert_eq!(render_json(&entries), input);
    }

    #[test]
    fn test_render_json_mixed_seconds() {
        let json = render_json(&[entry("b", 12.0, 0.75)]);
        assert!(json.contains("\"start\": 12,"));
        assert!(json.contains("\"duration\": 0.75"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], OutputFormat::Json), "[]");
        assert_eq!(render(&[], OutputFormat::Text), "");
        assert_eq!(render(&[], OutputFormat::Srt), "");
        assert_eq!(render(&[], OutputFormat::Vtt), "WEBVTT\n\n");
    }

    #[test]
    fn test_srt_indices_ignore_start_order() {
        let entries = vec![entry("c", 9.0, 1.0), entry("a", 1.0, 1.0), entry("b", 5.0, 1.0)];
        let srt = render_srt(&entries);
        let indices: Vec<&str> = srt.split("\n\n").map(|b| b.lines().next().unwrap()).collect();
        assert_eq!(indices, vec!["1", "2", "3"]);
        assert!(srt.starts_with("1\n00:00:09,000"));
    }

    #[test]
    fn test_overlapping_cues_are_kept() {
        let entries = vec![entry("one", 0.0, 5.0), entry("two", 2.0, 1.0)];
        let vtt = render_vtt(&entries);
        assert!(vtt.contains("00:00:00.000 --> 00:00:05.000\none"));
        assert!(vtt.contains("00:00:02.000 --> 00:00:03.000\ntwo"));
    }

    #[test]
    fn test_multiline_text_verbatim() {
        let srt = render_srt(&[entry("line one\nline two", 0.0, 1.0)]);
        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,000\nline one\nline two\n");
    }

    #[test]
    fn test_vtt_header_always_first() {
        for entries in [vec![], sample_entries()] {
            assert!(render_vtt(&entries).starts_with("WEBVTT\n\n"));
        }
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Text.extension(), "txt");
        assert_eq!(OutputFormat::Srt.mime_type(), "application/x-subrip");
        assert_eq!(OutputFormat::Vtt.mime_type(), "text/vtt");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
