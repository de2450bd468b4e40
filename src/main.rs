//! CLI entry point for the GTFS-RT decoder.
//!
//! Provides subcommands for decoding a feed from a file or URL and exporting
//! it as JSON, CSV rows, or a plain-text report.

use anyhow::Result;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use gtfs_rt_decoder::{
    feed::Feed,
    fetch::{BasicClient, fetch_bytes},
    output::{append_records, render_report, write_json, write_report},
    parser::parse_feed,
    stats::FeedSummary,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_rt_decoder")]
#[command(about = "Decode GTFS-RT feeds without compiled schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a feed and write it as pretty-printed JSON
    Json {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// File to write; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode a feed and append one CSV row per entity
    Csv {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append rows to
        #[arg(short, long, default_value = "entities.csv")]
        output: String,
    },
    /// Decode a feed and write a plain-text report
    Report {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// File to write; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_rt_decoder.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_rt_decoder.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Json { source, output } => {
            let feed = decode(&source).await?;
            match output {
                Some(path) => write_json(&path, &feed)?,
                None => println!("{}", serde_json::to_string_pretty(&feed)?),
            }
        }
        Commands::Csv { source, output } => {
            let feed = decode(&source).await?;
            append_records(&output, &feed.records())?;
        }
        Commands::Report { source, output } => {
            let feed = decode(&source).await?;
            match output {
                Some(path) => write_report(&path, &feed)?,
                None => print!("{}", render_report(&feed)),
            }
        }
    }

    Ok(())
}

/// Fetches and decodes one feed, logging its summary.
async fn decode(source: &str) -> Result<Feed> {
    let bytes = fetcher(source).await?;
    let feed = parse_feed(&bytes)?;

    let summary = FeedSummary::from_feed(&feed);
    info!(
        entities = summary.total_entities,
        vehicles = summary.vehicles,
        trip_updates = summary.trip_updates,
        alerts = summary.alerts,
        unknown = summary.unknown,
        "Feed decoded"
    );

    Ok(feed)
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &str) -> Result<Bytes> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        Bytes::from(std::fs::read(source)?)
    };
    Ok(bytes)
}
