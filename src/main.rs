use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod media;
mod utils;

use config::Config;
use media::{GrabOutcome, MediaFetcher, MediaGrabber, ReqwestTransport, TokenPool, TokioSleeper};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Post URL, e.g. https://x.com/user/status/123. Prompted for when omitted.
    url: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Attempts before giving up on a rate-limited post
    #[arg(long)]
    max_retries: Option<u32>,

    /// Seconds to wait after a 429 without a retry-after header
    #[arg(long)]
    backoff: Option<u64>,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/tweetgrab/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/tweetgrab/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(format: &str) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_url_from_stdin() -> Result<String> {
    print!("Enter a Twitter URL: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match get_config_path(&args) {
        Some(path) => {
            Config::from_file(&path).with_context(|| format!("Failed to load config from {}", path))?
        }
        None => Config::default(),
    };

    init_logging(config.get_logging_format());

    let mut twitter = config.twitter.clone();
    if let Some(max_retries) = args.max_retries {
        twitter.max_retries = max_retries;
    }
    if let Some(backoff) = args.backoff {
        twitter.base_backoff_seconds = backoff;
    }

    let tokens = TokenPool::new(twitter.bearer_tokens(|name| std::env::var(name).ok()))?;
    info!("Using {} bearer token(s)", tokens.count());

    let transport = ReqwestTransport::new(twitter.request_timeout())?;
    let fetcher = MediaFetcher::new(
        Box::new(transport),
        Box::new(TokioSleeper),
        tokens,
        twitter.retry_policy(),
    )
    .with_base_url(twitter.api_base_url.clone());
    let grabber = MediaGrabber::new(fetcher);

    let url = match args.url {
        Some(url) => url,
        None => read_url_from_stdin()?,
    };

    match grabber.grab(&url).await {
        GrabOutcome::Links(links) => {
            println!("✅ Media found! Here are the links:");
            for link in links {
                println!("{link}");
            }
        }
        GrabOutcome::NoMedia => println!("❌ No media found in the provided post."),
        GrabOutcome::InvalidUrl => {
            println!("Invalid Twitter URL. Please provide a valid post link.")
        }
        GrabOutcome::FetchFailed(failure) => {
            println!("❌ Failed to fetch media from the Twitter API: {failure}")
        }
    }

    Ok(())
}
