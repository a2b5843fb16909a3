//! Searchable transcript listing.

use regex::{Regex, RegexBuilder};

use crate::timestamp::format_clock;
use crate::{Transcript, TranscriptEntry, VideoInfo};

/// Entries whose text contains `term`, ignoring case. A blank term keeps everything.
pub fn search<'a>(entries: &'a [TranscriptEntry], term: &str) -> Vec<&'a TranscriptEntry> {
    let term = term.trim();
    if term.is_empty() {
        return entries.iter().collect();
    }

    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|e| e.text.to_lowercase().contains(&needle))
        .collect()
}

/// Number of matching entries, zero when there is no search term
pub fn match_count(entries: &[TranscriptEntry], term: &str) -> usize {
    if term.trim().is_empty() {
        return 0;
    }
    search(entries, term).len()
}

pub fn match_label(count: usize) -> String {
    match count {
        1 => "1 match".to_string(),
        n => format!("{n} matches"),
    }
}

/// Wrap every case-insensitive occurrence of `term` in `open`/`close`
pub fn highlight(text: &str, term: &str, open: &str, close: &str) -> String {
    let Some(re) = term_regex(term) else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures| format!("{open}{}{close}", &caps[0]))
        .into_owned()
}

fn term_regex(term: &str) -> Option<Regex> {
    if term.trim().is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

/// ISO 8601 duration for an offset in seconds, e.g. `PT1H2M3S`
pub fn iso_duration(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if secs > 0 || out == "PT" {
        out.push_str(&format!("{secs}S"));
    }
    out
}

/// Video details shown above the transcript
pub fn video_card(info: &VideoInfo, transcript: Option<&Transcript>) -> String {
    let mut card = format!(
        "Video: {} ({})\nChannel: {}\nDuration: {} ({})",
        info.title,
        info.id,
        info.channel,
        format_clock(info.duration as f64),
        iso_duration(info.duration as f64),
    );
    if let Some(t) = transcript {
        card.push_str(&format!(
            "\nLanguage: {} ({})\nAuto-generated: {}\nSegments: {}",
            t.language,
            t.language_code,
            if t.is_generated { "yes" } else { "no" },
            t.entries.len(),
        ));
    }
    card
}

/// Render the viewer listing: one `[M:SS] text` line per visible entry,
/// with matches wrapped in `open`/`close`.
pub fn render_listing(entries: &[TranscriptEntry], term: &str, open: &str, close: &str) -> String {
    let visible = search(entries, term);
    if visible.is_empty() {
        return if term.trim().is_empty() {
            "No transcript entries".to_string()
        } else {
            "No matches found".to_string()
        };
    }

    visible
        .iter()
        .map(|e| format!("[{}] {}", format_clock(e.start), highlight(&e.text, term, open, close)))
        .collect::<Vec<_>>()
        .join("\n")
}
