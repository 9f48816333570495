//! media-searcher: search stock media providers from the command line
//!
//! Thin wrapper around the library: loads settings, runs one search and
//! prints the aggregated result as JSON.

use anyhow::{bail, Context, Result};
use media_searcher::{
    config, MediaKind, MediaSelection, ProviderId, Query, SearchClient, SearchMode,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    mode: Option<SearchMode>,
    providers: Vec<ProviderId>,
    media: MediaSelection,
    deadline: Option<Duration>,
    list: bool,
    term: Vec<String>,
}

/// What the command line asks for
#[derive(Debug)]
enum Command {
    Help,
    Version,
    Run(Args),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("media-searcher {}", media_searcher::VERSION);
            return Ok(());
        }
        Command::Run(args) => args,
    };

    info!("Starting media-searcher v{}", media_searcher::VERSION);

    let settings = config::load(args.config.as_deref())?;
    let client = SearchClient::from_settings(&settings).context("failed to build search client")?;
    info!("Configured providers: {:?}", client.providers());

    if args.list {
        for (id, about) in client.describe() {
            println!(
                "{:<10} {:<28} official API: {:<5} key required: {}",
                id,
                about.website.as_deref().unwrap_or("-"),
                about.use_official_api,
                about.require_api_key
            );
        }
        return Ok(());
    }

    let query = Query::new(args.term.join(" "))
        .with_providers(args.providers)
        .with_media(args.media);
    let mode = args.mode.unwrap_or_else(|| client.default_mode());

    let result = match args.deadline {
        Some(deadline) => client.search_async_with_deadline(&query, mode, deadline).await?,
        None => client.search_async(&query, mode).await?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Command> {
    let mut args = Args::default();

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => args.config = Some(PathBuf::from(value(&mut argv, &arg)?)),
            "-m" | "--mode" => args.mode = Some(value(&mut argv, &arg)?.parse()?),
            "-p" | "--provider" => args.providers.push(value(&mut argv, &arg)?.parse()?),
            "-d" | "--deadline" => {
                let seconds: f64 = value(&mut argv, &arg)?
                    .parse()
                    .context("deadline must be a number of seconds")?;
                args.deadline = Some(Duration::try_from_secs_f64(seconds)?);
            }
            "--media" => {
                args.media = value(&mut argv, &arg)?
                    .parse::<MediaSelection>()
                    .map_err(anyhow::Error::msg)?
            }
            "--video" => args.media = MediaKind::Video.into(),
            "-l" | "--list" => args.list = true,
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            _ => args.term.push(arg),
        }
    }

    if args.term.is_empty() && !args.list {
        return Ok(Command::Help);
    }
    Ok(Command::Run(args))
}

fn value(argv: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    argv.next()
        .with_context(|| format!("missing value for {}", flag))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
media-searcher v{}
Unified search across Pixabay, Unsplash and Pexels

USAGE:
    media-searcher [OPTIONS] <TERM>...

OPTIONS:
    -c, --config <FILE>       Path to configuration file
    -m, --mode <MODE>         single or hybrid
    -p, --provider <NAME>     Provider to search (repeatable)
    -d, --deadline <SECS>     Abandon providers still pending after SECS
        --media <KIND>        image, video or all
        --video               Same as --media video
    -l, --list                List configured providers and exit
    -h, --help                Print help information
    -V, --version             Print version information

ENVIRONMENT VARIABLES:
    MEDIA_SEARCHER_SETTINGS_PATH  Path to settings.yml
    MEDIA_SEARCHER_MODE           Default search mode
    MEDIA_SEARCHER_TIMEOUT        Per-provider timeout in seconds
    PIXABAY_KEY, UNSPLASH_KEY, PEXELS_KEY
                                  API keys
"#,
        media_searcher::VERSION
    );
}
