use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use eyre::Result;
use log::debug;
use regex::Regex;

use crate::output::OutputFormat;

const MAX_FILENAME_CHARS: usize = 100;

static RESERVED_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("reserved chars pattern"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Transcript content ready to be copied or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    pub fn new(title: &str, video_id: &str, format: OutputFormat, contents: String) -> Self {
        Self {
            filename: export_filename(title, video_id, format),
            mime_type: format.mime_type(),
            contents,
        }
    }

    /// Write the file into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        debug!("Wrote {} ({})", path.display(), self.mime_type);
        Ok(path)
    }
}

/// Strip characters filesystems reject, turn whitespace runs into `_`
/// and cap the length.
pub fn sanitize_filename(title: &str) -> String {
    let stripped = RESERVED_CHARS.replace_all(title, "");
    let joined = WHITESPACE_RUN.replace_all(&stripped, "_");
    joined.chars().take(MAX_FILENAME_CHARS).collect()
}

/// `<sanitized-title>_<videoId>.<ext>`
pub fn export_filename(title: &str, video_id: &str, format: OutputFormat) -> String {
    format!("{}_{video_id}.{}", sanitize_filename(title), format.extension())
}
