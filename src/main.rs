//! Command-line front end
//!
//! Loads configuration, initializes logging and runs one extraction, printing
//! the outcome as JSON on stdout.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use listing_inference::infrastructure::init_logging_with_config;
use listing_inference::{
    AppConfig, DetectionBox, ExtractOptions, ListExtractor, RenderedPage, SeedPoint, StaticHtmlTree, detail_seed,
    seeds_from_detections,
};

#[derive(Parser, Debug)]
#[command(name = "listing-inference", version, about = "Find repeated list items on a page from a few seeds")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON); LISTING__* variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the list that the seeds point into
    Extract(ExtractArgs),
    /// Find the dominant list of a parsed document without seeds
    Scan {
        #[arg(long)]
        html: PathBuf,
    },
    /// Find the container under the largest detection of a detail page
    Detail {
        /// Rendered-page snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// JSON list of detection boxes, in screenshot pixels
        #[arg(long)]
        detections: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Raw markup; seeds come from --select
    #[arg(long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
    html: Option<PathBuf>,

    /// CSS selectors whose matches become seeds
    #[arg(long, num_args = 1.., requires = "html")]
    select: Vec<String>,

    /// Rendered-page snapshot (JSON); seeds come from --point or --detections
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Page coordinate seed, as X,Y
    #[arg(long, num_args = 1.., value_parser = parse_point, requires = "snapshot")]
    point: Vec<SeedPoint>,

    /// JSON list of detection boxes
    #[arg(long, requires = "snapshot")]
    detections: Option<PathBuf>,

    /// Container identity the result must carry
    #[arg(long)]
    expect: Option<String>,
}

fn parse_point(value: &str) -> Result<SeedPoint, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{value}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{value}': {e}"))?;
    Ok(SeedPoint::point(x, y))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_detections(path: &Path) -> Result<Vec<DetectionBox>> {
    serde_json::from_str(&read(path)?).with_context(|| format!("Invalid detections {}", path.display()))
}

fn run_extract(config: &AppConfig, args: &ExtractArgs) -> Result<()> {
    let extractor = ListExtractor::new(config.extraction.clone());
    let options = ExtractOptions {
        expected_container: args.expect.clone(),
    };

    let outcome = if let Some(path) = &args.html {
        let page = StaticHtmlTree::parse(&read(path)?);
        let mut seeds = Vec::new();
        for css in &args.select {
            seeds.extend(page.select(css)?.into_iter().map(SeedPoint::node));
        }
        info!("{} seeds from {} selectors", seeds.len(), args.select.len());
        extractor.extract_with(&page, &seeds, &options)?
    } else if let Some(path) = &args.snapshot {
        let page = RenderedPage::from_json(&read(path)?)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        let mut seeds = args.point.clone();
        if let Some(detections) = &args.detections {
            let boxes = read_detections(detections)?;
            seeds.extend(seeds_from_detections(&boxes, &config.detection)?);
        }
        info!("{} seeds for {}", seeds.len(), page.url().unwrap_or("snapshot"));
        extractor.extract_with(&page, &seeds, &options)?
    } else {
        bail!("either --html or --snapshot is required");
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_scan(config: &AppConfig, html: &Path) -> Result<()> {
    let page = StaticHtmlTree::parse(&read(html)?);
    let scan = ListExtractor::new(config.extraction.clone()).scan_document(&page);
    println!("{}", serde_json::to_string_pretty(&scan)?);
    Ok(())
}

fn run_detail(config: &AppConfig, snapshot: &Path, detections: &Path) -> Result<()> {
    let page = RenderedPage::from_json(&read(snapshot)?)
        .with_context(|| format!("Invalid snapshot {}", snapshot.display()))?;
    let boxes = read_detections(detections)?;

    let detail = match detail_seed(&boxes, &config.detection, page.device_pixel_ratio())? {
        Some(seed) => ListExtractor::new(config.extraction.clone()).detail_container(&page, seed)?,
        None => {
            info!("No usable detection for {}", page.url().unwrap_or("snapshot"));
            None
        }
    };

    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;

    match &cli.command {
        Command::Extract(args) => run_extract(&config, args),
        Command::Scan { html } => run_scan(&config, html),
        Command::Detail { snapshot, detections } => run_detail(&config, snapshot, detections),
    }
}
