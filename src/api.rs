//! Client for the remote captioning API.
//!
//! Every request is issued once; failures are reported immediately and
//! never retried.

use std::future::Future;

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::output::OutputFormat;
use crate::{Transcript, VideoInfo};

pub const DEFAULT_LANGUAGE: &str = "en";

const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response from the API
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Unexpected response from the transcript service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Operations the session needs from the captioning backend
pub trait TranscriptApi {
    fn video_info(&self, video_id: &str) -> impl Future<Output = Result<VideoInfo, ClientError>>;

    /// Structured transcript; `None` when the video has no captions
    fn transcript(
        &self,
        video_id: &str,
        lang: &str,
    ) -> impl Future<Output = Result<Option<Transcript>, ClientError>>;

    /// Transcript pre-rendered by the backend in a non-JSON format
    fn transcript_raw(
        &self,
        video_id: &str,
        format: OutputFormat,
        lang: &str,
    ) -> impl Future<Output = Result<String, ClientError>>;
}

impl<T: TranscriptApi> TranscriptApi for &T {
    fn video_info(&self, video_id: &str) -> impl Future<Output = Result<VideoInfo, ClientError>> {
        (**self).video_info(video_id)
    }

    fn transcript(
        &self,
        video_id: &str,
        lang: &str,
    ) -> impl Future<Output = Result<Option<Transcript>, ClientError>> {
        (**self).transcript(video_id, lang)
    }

    fn transcript_raw(
        &self,
        video_id: &str,
        format: OutputFormat,
        lang: &str,
    ) -> impl Future<Output = Result<String, ClientError>> {
        (**self).transcript_raw(video_id, format, lang)
    }
}

/// HTTP implementation of [`TranscriptApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn video_url(&self, video_id: &str, path: &str) -> String {
        format!("{}/api/video/{video_id}{path}", self.base_url)
    }

    /// Ask the backend whether it is up
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}/api/health", self.base_url);
        let body = self.get_text(&url, &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ClientError> {
        let body = self.get_text(url, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        debug!("GET {url} {query:?}");

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = resp.status();
        let body = resp.text().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            debug!("{url} returned {status}: {message}");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

impl TranscriptApi for ApiClient {
    async fn video_info(&self, video_id: &str) -> Result<VideoInfo, ClientError> {
        self.get_json(&self.video_url(video_id, "/info"), &[]).await
    }

    async fn transcript(&self, video_id: &str, lang: &str) -> Result<Option<Transcript>, ClientError> {
        let query = [("format", OutputFormat::Json.as_str()), ("languages", lang)];
        self.get_json(&self.video_url(video_id, "/transcript"), &query).await
    }

    async fn transcript_raw(&self, video_id: &str, format: OutputFormat, lang: &str) -> Result<String, ClientError> {
        let query = [("format", format.as_str()), ("languages", lang)];
        self.get_text(&self.video_url(video_id, "/transcript"), &query).await
    }
}

/// Message for a failed response: the body's `message` string when present,
/// `HTTP error <status>` for any other JSON body, and a generic message when
/// the body is not JSON at all.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error {status}")),
        Err(_) => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}
