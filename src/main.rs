mod geocode;
mod parser;
mod pipeline;
mod record;
mod session;
mod standardize;

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use geocode::GeoResolver;
use record::{ContactChannel, DraftRecord, FinalizedRecord};
use session::Session;

#[derive(Parser)]
#[command(name = "intake", about = "Customer service intake: messy text to standardized, geocoded records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a draft record from raw text (review/edit happens outside)
    Extract {
        /// Input text file; omit to read stdin
        file: Option<PathBuf>,
        /// Inline input text instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// How the customer contacted us
        #[arg(short, long, value_enum, default_value = "email")]
        channel: ContactChannel,
    },
    /// Full pipeline on one input: extract, standardize, geocode, finalize
    Run {
        /// Input text file; omit to read stdin
        file: Option<PathBuf>,
        /// Inline input text instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Reviewed draft record (JSON) to finalize instead of re-extracting
        #[arg(long, conflicts_with_all = ["file", "text"])]
        draft: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "email")]
        channel: ContactChannel,
        /// Skip the remote geocoding lookup
        #[arg(long)]
        no_geocode: bool,
    },
    /// Process every .txt file in a directory
    Batch {
        dir: PathBuf,
        /// Max files to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(short, long, value_enum, default_value = "form")]
        channel: ContactChannel,
        /// Skip the remote geocoding lookup
        #[arg(long)]
        no_geocode: bool,
        /// Dump all finalized records as JSON instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Resolve a single address to coordinates
    Geocode { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { file, text, channel } => {
            let input = read_input(file, text)?;
            if parser::is_diagnostic(&input) {
                warn!("Input looks like an OCR diagnostic; fields will need manual entry");
            }
            let draft = pipeline::extract_draft(&input, channel);
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        Commands::Run { file, text, draft, channel, no_geocode } => {
            let draft_record = match draft {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read draft {}", path.display()))?;
                    serde_json::from_str::<DraftRecord>(&json)
                        .with_context(|| format!("Invalid draft JSON in {}", path.display()))?
                }
                None => {
                    let input = read_input(file, text)?;
                    pipeline::extract_draft(&input, channel)
                }
            };

            let resolver = if no_geocode { None } else { Some(GeoResolver::new()?) };
            let mut session = Session::new();
            let record =
                pipeline::finalize_draft(draft_record, &mut session, resolver.as_ref()).await;

            print_record_summary(&record);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Batch { dir, limit, channel, no_geocode, json } => {
            run_batch(dir, limit, channel, no_geocode, json).await
        }
        Commands::Geocode { address } => {
            let resolver = GeoResolver::new()?;
            match resolver.resolve(&address).await {
                geocode::Geocoded::Found { lat, lng, display_name } => {
                    println!("Found: {}", display_name);
                    println!("Latitude:  {:.6}", lat);
                    println!("Longitude: {:.6}", lng);
                }
                geocode::Geocoded::Failed(msg) => {
                    println!("Lookup failed: {}", msg);
                    println!("Enter coordinates manually on the record.");
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_input(file: Option<PathBuf>, text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

async fn run_batch(
    dir: PathBuf,
    limit: Option<usize>,
    channel: ContactChannel,
    no_geocode: bool,
    json: bool,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .txt files in {}.", dir.display());
        return Ok(());
    }

    println!("Extracting {} files...", files.len());
    // Extraction is pure per-file work; records are independent.
    let drafts: Vec<DraftRecord> = files
        .par_iter()
        .filter_map(|path| match std::fs::read_to_string(path) {
            Ok(text) => Some(pipeline::extract_draft(&text, channel)),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    let resolver = if no_geocode { None } else { Some(GeoResolver::new()?) };
    let mut session = Session::new();

    let pb = ProgressBar::new(drafts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );
    // One record in flight at a time: Nominatim expects sequential queries.
    for draft in drafts {
        pipeline::finalize_draft(draft, &mut session, resolver.as_ref()).await;
        pb.inc(1);
    }
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(session.cases())?);
        return Ok(());
    }

    println!(
        "{:>3} | {:<18} | {:<20} | {:<12} | {:<28} | {:<22} | {:>20}",
        "#", "Case ID", "Customer", "Phone", "Address", "Risk", "Coordinates"
    );
    println!("{}", "-".repeat(140));
    for (i, r) in session.cases().iter().enumerate() {
        let coords = match (r.gps_lat, r.gps_lng) {
            (Some(lat), Some(lng)) => format!("{:.5}, {:.5}", lat, lng),
            _ => "-".to_string(),
        };
        println!(
            "{:>3} | {:<18} | {:<20} | {:<12} | {:<28} | {:<22} | {:>20}",
            i + 1,
            r.case_id,
            truncate(r.customer_name.as_deref().unwrap_or("-"), 20),
            truncate(r.phone.as_deref().unwrap_or("-"), 12),
            truncate(r.street_address.as_deref().unwrap_or("-"), 28),
            truncate(&r.risk_flags_display(), 22),
            coords,
        );
    }

    let geocoded = session.cases().iter().filter(|r| r.gps_lat.is_some()).count();
    let flagged = session.cases().iter().filter(|r| !r.risk_flags.is_empty()).count();
    println!(
        "\n{} cases ({} geocoded, {} risk-flagged).",
        session.len(),
        geocoded,
        flagged
    );
    Ok(())
}

fn print_record_summary(record: &FinalizedRecord) {
    println!("Case ID:   {}", record.case_id);
    println!("Phone:     {}", record.phone.as_deref().unwrap_or("-"));
    println!("Contact:   {}", record.initial_contact_datetime);
    println!("Risk:      {}", record.risk_flags_display());
    println!("Location:  {}", record.formatted_address);
    println!("Filename:  {}", record.recommended_filename);
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
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
