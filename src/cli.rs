use clap::Parser;
use std::path::PathBuf;

use ytcap::output::OutputFormat;
use ytcap::session::RenderMode;

#[derive(Parser)]
#[command(
    name = "ytcap",
    about = "YouTube caption viewer and exporter",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json, srt, vtt
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, conflicts_with = "download")]
    pub output: Option<PathBuf>,

    /// Save as <title>_<id>.<ext> in the current directory
    #[arg(short, long)]
    pub download: bool,

    /// Show matching cues instead of the formatted transcript
    #[arg(short, long, conflicts_with_all = ["output", "download"])]
    pub search: Option<String>,

    /// Base URL of the captioning API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Render formats locally or fetch them from the API
    #[arg(long, value_enum)]
    pub render: Option<RenderMode>,

    /// Check that the captioning API is reachable and exit
    #[arg(long)]
    pub health: bool,

    /// Show video details
    #[arg(short, long)]
    pub verbose: bool,
}
