//! Transcript session state machine.
//!
//! A session owns one [`SessionState`] and changes it only through
//! commands: [`Session::submit`], [`Session::set_format`] and
//! [`Session::reset`]. Each network-backed command is split into a
//! `begin_*` step that records the request and an `apply_*` step that
//! commits its outcome, so results that arrive after a newer request are
//! dropped instead of overwriting newer state.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{ClientError, DEFAULT_LANGUAGE, TranscriptApi};
use crate::export::ExportFile;
use crate::output::{self, OutputFormat};
use crate::{Transcript, TranscriptEntry, VideoInfo};

/// Where non-JSON formats are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Encode every format from the structured entries
    #[default]
    Local,
    /// Fetch text/srt/vtt pre-rendered by the backend
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    LoadingFormat,
    ReadyWithTranscript,
    ReadyNoTranscript,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Video,
    Format,
}

/// Snapshot of everything the viewer shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub video_info: Option<VideoInfo>,
    pub transcript: Option<Transcript>,
    /// Backend-rendered text for the active format, if fetched
    pub raw_transcript: Option<String>,
    pub error: Option<String>,
    pub format: OutputFormat,
    pub has_transcript: bool,
    pending: Option<Pending>,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.pending, &self.video_info) {
            (Some(Pending::Video), _) => Phase::Loading,
            (Some(Pending::Format), _) => Phase::LoadingFormat,
            (None, Some(_)) if self.has_transcript => Phase::ReadyWithTranscript,
            (None, Some(_)) => Phase::ReadyNoTranscript,
            (None, None) if self.error.is_some() => Phase::Failed,
            (None, None) => Phase::Idle,
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        self.transcript.as_ref().map(|t| t.entries.as_slice()).unwrap_or_default()
    }
}

/// Result of the initial load for one video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoData {
    pub info: VideoInfo,
    pub transcript: Option<Transcript>,
}

/// An issued full fetch, committed with [`Session::apply_video`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    seq: u64,
    pub video_id: String,
}

/// An issued raw-format fetch, committed with [`Session::apply_format`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    seq: u64,
    format_seq: u64,
    pub video_id: String,
    pub format: OutputFormat,
}

/// Fetch metadata and structured transcript concurrently; either failure fails the load
pub async fn load_video<A: TranscriptApi>(api: &A, video_id: &str, lang: &str) -> Result<VideoData, ClientError> {
    let (info, transcript) = tokio::try_join!(api.video_info(video_id), api.transcript(video_id, lang))?;
    Ok(VideoData { info, transcript })
}

pub struct Session<A> {
    api: A,
    state: SessionState,
    lang: String,
    render_mode: RenderMode,
    active: Option<String>,
    seq: u64,
    format_seq: u64,
    /// A remote format was picked while the video was still loading
    format_deferred: bool,
}

impl<A: TranscriptApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: SessionState::default(),
            lang: DEFAULT_LANGUAGE.to_string(),
            render_mode: RenderMode::default(),
            active: None,
            seq: 0,
            format_seq: 0,
            format_deferred: false,
        }
    }

    pub fn with_language(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Identifier of the most recently submitted video
    pub fn active_video(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Load a video, replacing whatever the session held
    pub async fn submit(&mut self, video_id: &str) {
        let request = self.begin_submit(video_id);
        let outcome = load_video(&self.api, &request.video_id, &self.lang).await;
        if self.apply_video(request, outcome) {
            if let Some(request) = self.resume_format() {
                self.fetch_format(request).await;
            }
        }
    }

    /// Switch the output format, fetching the backend rendering when configured to
    pub async fn set_format(&mut self, format: OutputFormat) {
        if let Some(request) = self.begin_format(format) {
            self.fetch_format(request).await;
        }
    }

    async fn fetch_format(&mut self, request: FormatRequest) {
        let outcome = self
            .api
            .transcript_raw(&request.video_id, request.format, &self.lang)
            .await;
        self.apply_format(request, outcome);
    }

    /// Back to idle. In-flight results are discarded when they land.
    pub fn reset(&mut self) {
        debug!("Session reset");
        self.seq += 1;
        self.format_seq += 1;
        self.active = None;
        self.format_deferred = false;
        self.state = SessionState::default();
    }

    /// Start a full fetch. All previous results are cleared and the format
    /// goes back to its default.
    pub fn begin_submit(&mut self, video_id: &str) -> VideoRequest {
        self.seq += 1;
        self.format_seq += 1;
        self.active = Some(video_id.to_string());
        self.format_deferred = false;
        self.state = SessionState {
            pending: Some(Pending::Video),
            ..SessionState::default()
        };
        info!("Loading video {video_id} (request {})", self.seq);

        VideoRequest {
            seq: self.seq,
            video_id: video_id.to_string(),
        }
    }

    /// Commit a full fetch. Returns false when the request was superseded.
    pub fn apply_video(&mut self, request: VideoRequest, outcome: Result<VideoData, ClientError>) -> bool {
        if !self.is_current(request.seq, &request.video_id) {
            debug!("Discarding stale result for {} (request {})", request.video_id, request.seq);
            return false;
        }

        self.state.pending = None;
        match outcome {
            Ok(VideoData { info, transcript }) => {
                let has_transcript = transcript.as_ref().is_some_and(|t| !t.entries.is_empty());
                info!(
                    "Loaded {} ({} cues)",
                    info.id,
                    transcript.as_ref().map_or(0, |t| t.entries.len())
                );
                self.state.video_info = Some(info);
                self.state.transcript = transcript;
                self.state.raw_transcript = None;
                self.state.has_transcript = has_transcript;
                self.state.error = None;
            }
            Err(e) => {
                warn!("Failed to load {}: {e}", request.video_id);
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Select a format. Returns the raw fetch to issue, if one is needed.
    pub fn begin_format(&mut self, format: OutputFormat) -> Option<FormatRequest> {
        let changed = format != self.state.format;
        self.state.format = format;

        if format.is_structured() {
            self.format_deferred = false;
            self.format_seq += 1;
            self.state.raw_transcript = None;
            if self.state.pending == Some(Pending::Format) {
                self.state.pending = None;
            }
            return None;
        }

        if !changed && (self.state.raw_transcript.is_some() || self.state.pending == Some(Pending::Format)) {
            return None;
        }

        if changed {
            self.format_seq += 1;
            self.state.raw_transcript = None;
            if self.state.pending == Some(Pending::Format) {
                self.state.pending = None;
            }
        }

        if self.render_mode == RenderMode::Local {
            return None;
        }
        if self.state.pending == Some(Pending::Video) {
            self.format_deferred = true;
            return None;
        }
        if !self.state.has_transcript {
            return None;
        }
        let video_id = self.active.clone()?;

        self.format_seq += 1;
        self.state.pending = Some(Pending::Format);
        debug!("Fetching {format} rendering for {video_id}");

        Some(FormatRequest {
            seq: self.seq,
            format_seq: self.format_seq,
            video_id,
            format,
        })
    }

    /// Raw fetch for a format selected while the video was loading, once
    /// the video has been applied.
    pub fn resume_format(&mut self) -> Option<FormatRequest> {
        if self.state.is_loading() || !std::mem::take(&mut self.format_deferred) {
            return None;
        }
        self.begin_format(self.state.format)
    }

    /// Commit a raw-format fetch. A failure keeps the loaded transcript.
    pub fn apply_format(&mut self, request: FormatRequest, outcome: Result<String, ClientError>) -> bool {
        if request.format_seq != self.format_seq || !self.is_current(request.seq, &request.video_id) {
            debug!("Discarding stale {} rendering for {}", request.format, request.video_id);
            return false;
        }

        self.state.pending = None;
        match outcome {
            Ok(raw) => {
                self.state.raw_transcript = Some(raw);
                self.state.error = None;
            }
            Err(e) => {
                warn!("Failed to fetch {} rendering for {}: {e}", request.format, request.video_id);
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Content for the selected format: the backend rendering when one is
    /// cached, otherwise encoded locally.
    pub fn content(&self) -> Option<String> {
        if !self.state.has_transcript {
            return None;
        }
        let format = self.state.format;
        match &self.state.raw_transcript {
            Some(raw) if !format.is_structured() => Some(raw.clone()),
            _ => Some(output::render(self.state.entries(), format)),
        }
    }

    /// Downloadable artifact for the selected format
    pub fn export(&self) -> Option<ExportFile> {
        let info = self.state.video_info.as_ref()?;
        let contents = self.content()?;
        Some(ExportFile::new(&info.title, &info.id, self.state.format, contents))
    }

    fn is_current(&self, seq: u64, video_id: &str) -> bool {
        seq == self.seq && self.active.as_deref() == Some(video_id)
    }
}
