use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use tracing::info;

use league_calendars::{CrawlConfig, LeagueCrawler};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the calendars are written under
    #[arg(short, long, value_name = "DIR", default_value = "schedules")]
    output: PathBuf,
    /// Site root all links are resolved against
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// League list page, relative to the base url
    #[arg(long, value_name = "PATH")]
    start_path: Option<String>,
    /// Maximum number of pages fetched at once
    #[arg(short, long, default_value_t = 4)]
    concurrency: usize,
    /// Extra attempts for a failed fetch
    #[arg(long, default_value_t = 2)]
    max_retries: u32,
    /// Pretend it is this time, e.g. 2024-06-15 or 2024-06-15T19:30:00
    #[arg(long, value_name = "DATETIME", value_parser = parse_now)]
    now: Option<NaiveDateTime>,
}

fn parse_now(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").or_else(|_| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("league_calendars=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = CrawlConfig {
        output_root: args.output,
        concurrency: args.concurrency,
        max_retries: args.max_retries,
        reference_time: args.now,
        ..CrawlConfig::default()
    };
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(start_path) = args.start_path {
        config.start_path = start_path;
    }

    let crawler = LeagueCrawler::new(config)?;
    let report = crawler.run().await?;

    info!(
        calendars = report.calendars.len(),
        failures = report.failures.len(),
        "done"
    );
    for failure in &report.failures {
        eprintln!("skipped {}: {}", failure.request.url, failure.error);
    }
    Ok(())
}
