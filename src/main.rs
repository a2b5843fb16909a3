use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::Cli;
use ytcap::api::{ApiClient, DEFAULT_LANGUAGE};
use ytcap::session::Session;
use ytcap::viewer;

const HIGHLIGHT_START: &str = "\x1b[1;33m";
const HIGHLIGHT_END: &str = "\x1b[0m";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytcap.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytcap")
        .join("logs")
}

fn build_after_help() -> String {
    let config_path = ytcap::config::config_path();
    let log_path = log_dir().join("ytcap.log");

    format!(
        "\nCONFIG:\n  {} (api_base_url, default_lang, default_format, render_mode)\n  {} overrides api_base_url\n\nLogs are written to: {}",
        config_path.display(),
        ytcap::config::API_URL_ENV,
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytcap::config::Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        ytcap::config::Config::default()
    });

    // CLI flags take priority over config
    let base_url = cli.api_url.clone().unwrap_or_else(|| config.base_url());
    let lang = cli
        .lang
        .clone()
        .or(config.default_lang.clone())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let format = cli.format.or(config.default_format).unwrap_or_default();
    let render_mode = cli.render.or(config.render_mode).unwrap_or_default();

    debug!("API {base_url}, lang={lang}, format={format}, render={render_mode:?}");

    let client = ApiClient::new(&base_url);

    if cli.health {
        let health = client.health().await?;
        println!("{base_url}: {}", health.status);
        return Ok(());
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: ytcap <URL>\n       echo <URL> | ytcap");
    }

    let mut session = Session::new(client).with_language(&lang).with_render_mode(render_mode);

    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        let video_id = match ytcap::resolve_input(url_input) {
            Ok(id) => id,
            Err(e) => bail!(
                "{e}: {url_input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"
            ),
        };

        session.submit(&video_id).await;
        if let Some(ref error) = session.state().error {
            bail!("{video_id}: {error}");
        }

        if cli.verbose {
            if let Some(ref info) = session.state().video_info {
                eprintln!("{}", viewer::video_card(info, session.state().transcript.as_ref()));
            }
        }

        if !session.state().has_transcript {
            eprintln!("No transcript available for this video.\nThis video doesn't have captions or subtitles enabled.");
            continue;
        }

        session.set_format(format).await;
        if let Some(ref error) = session.state().error {
            eprintln!("Could not fetch {format} rendering ({error}), encoding locally");
        }

        if let Some(ref term) = cli.search {
            let entries = session.state().entries();
            if !term.trim().is_empty() {
                eprintln!("{}", viewer::match_label(viewer::match_count(entries, term)));
            }
            println!(
                "{}",
                viewer::render_listing(entries, term, HIGHLIGHT_START, HIGHLIGHT_END)
            );
            continue;
        }

        let Some(export) = session.export() else {
            continue;
        };

        if cli.download {
            let path = export.write_to(&std::env::current_dir()?)?;
            eprintln!("Saved {} ({})", path.display(), export.mime_type);
        } else if let Some(ref path) = cli.output {
            std::fs::write(path, &export.contents)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{}", export.contents);
        }
    }

    Ok(())
}
