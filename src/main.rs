use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use eagle_eye::config::{ContentType, FormatSelection, Granularity, RunConfig, Settings};
use eagle_eye::loader::{HttpLoader, PageLoader, SnapshotLoader};
use eagle_eye::prompt::{granularity_preset, split_channels, Prompter};
use eagle_eye::runner::{RunOutcome, RunReport, Runner};

#[derive(Parser)]
#[command(
    name = "eagle_eye",
    about = "Scrape videos, streams and shorts from YouTube channels",
    disable_version_flag = true
)]
struct Cli {
    /// Channel handles or ids (comma or space separated); asked for when omitted
    channels: Vec<String>,

    /// Print the version and exit
    #[arg(short = 'v', short_alias = 'V', long)]
    version: bool,

    /// Root folder for exported files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Read listing pages from saved HTML files in this folder instead of the network
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// videos, streams or shorts; asked for when omitted
    #[arg(long, value_parser = parse_content)]
    content: Option<ContentType>,

    /// One summary row per channel instead of one row per video
    #[arg(long, conflicts_with = "detail")]
    summary: bool,

    /// One row per video; skips the granularity question
    #[arg(long)]
    detail: bool,

    /// Keep at most this many items per channel
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max: Option<u64>,

    /// `all` or a list such as `csv,json`; asked for when omitted
    #[arg(long)]
    formats: Option<FormatSelection>,
}

fn parse_content(s: &str) -> Result<ContentType, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "videos" => Ok(ContentType::Videos),
        "streams" => Ok(ContentType::Streams),
        "shorts" => Ok(ContentType::Shorts),
        other => Err(format!("unknown content type `{}`", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.version {
        println!("Eagle Eye Project Version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Prompts block on stdin, so the interrupt is watched from its own task.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n\nWARNING: Ctrl+C detected. Exiting the program...");
            std::process::exit(0);
        }
    });

    let t0 = Instant::now();
    let mut settings = Settings::load().context("loading settings")?;
    if let Some(dir) = cli.output_dir.clone() {
        settings.output_dir = dir;
    }
    if let Some(dir) = cli.snapshots.clone() {
        settings.snapshot_dir = Some(dir);
    }

    let (channels, run) = collect_choices(&cli, &settings)?;
    println!("\nScraping {} channel(s), please wait...", channels.len());

    let report = match &settings.snapshot_dir {
        Some(dir) => execute(SnapshotLoader::new(dir), run, &channels).await?,
        None => execute(HttpLoader::new(&settings)?, run, &channels).await?,
    };
    print_report(&report);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

/// Command-line values first; anything missing is asked for on the terminal.
fn collect_choices(cli: &Cli, settings: &Settings) -> anyhow::Result<(Vec<String>, RunConfig)> {
    let stdin = io::stdin();
    let mut prompt = Prompter::new(stdin.lock(), io::stdout());

    let channels: Vec<String> = cli.channels.iter().flat_map(|c| split_channels(c)).collect();
    let channels = if channels.is_empty() {
        prompt.channels()?
    } else {
        channels
    };

    let content = match cli.content {
        Some(c) => c,
        None => prompt.content_type()?,
    };
    let granularity = match granularity_preset(content, cli.summary, cli.detail) {
        Some(g) => g,
        None => prompt.granularity()?,
    };
    let max_count = match cli.max {
        Some(n) => Some(n as usize),
        None if granularity == Granularity::ChannelSummary => None,
        None => prompt.max_count(content)?,
    };
    let formats = match &cli.formats {
        Some(f) => f.clone(),
        None => prompt.formats()?,
    };

    let run = RunConfig::new(content, granularity, max_count, formats, &settings.output_dir)
        .with_site_origin(settings.site_origin.clone());
    Ok((channels, run))
}

async fn execute<L: PageLoader>(loader: L, run: RunConfig, channels: &[String]) -> anyhow::Result<RunReport> {
    let root = run.output_root.clone();
    Runner::new(loader, run)
        .run(channels)
        .await
        .with_context(|| format!("run into {}", root.display()))
}

fn print_report(report: &RunReport) {
    for path in &report.combined {
        println!("Combined export saved to {}", path.display());
    }
    if let Some(e) = &report.combined_error {
        println!("WARNING: combined export failed: {}", e);
    }
    if let Some(e) = &report.merge_error {
        println!("WARNING: summary merge failed: {}", e);
    }
    if let Some(merged) = &report.merged {
        println!(
            "Merged {} summary file(s), {} row(s):",
            merged.sources.len(),
            merged.rows
        );
        for path in &merged.written {
            println!("  {}", path.display());
        }
    }

    match report.outcome() {
        RunOutcome::Completed { records } => println!(
            "\n{} record(s) from {} channel(s) ({} failed).",
            records,
            report.channels.len(),
            report.failed()
        ),
        RunOutcome::NothingScraped => println!("\nNo data was scraped."),
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
