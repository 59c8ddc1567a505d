//! Batch command - scan many card files with one OCR engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cardscan_core::models::config::CardscanConfig;
use cardscan_core::models::contact::ContactRecord;
use cardscan_core::{
    export, CardPreprocessor, CardScanner, PureOcrEngine, ScanResult, StaticText,
};

use super::scan::{format_record, OutputFormat};
use super::{build_extractor, input_kind, load_config, load_engine, ExtractionArgs, InputKind};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "cards/*.jpg")
    #[arg(required = true)]
    input: String,

    /// Output directory for per-card results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each card
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary CSV with one row per card
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ContactRecord>,
    error: Option<String>,
    no_text: bool,
    processing_time_ms: u64,
}

/// Scanners built once per batch. The OCR engine is only loaded if an image is present.
struct Scanners {
    lines: CardScanner<StaticText>,
    images: Option<CardScanner<PureOcrEngine>>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| input_kind(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let scanners = build_scanners(&files, &args, &config)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = scan_single_file(&path, &scanners);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(scan) => {
                let no_text = scan.no_text();
                if no_text {
                    warn!("No text detected in {}", path.display());
                }
                results.push(ProcessResult {
                    path,
                    record: Some(scan.record),
                    error: None,
                    no_text,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        no_text: false,
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            if let Some(record) = &result.record {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("card");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.record.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    let no_text = results.iter().filter(|r| r.no_text).count();
    if no_text > 0 {
        println!(
            "{} {} file(s) with no text detected",
            style("⚠").yellow(),
            no_text
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn build_scanners(
    files: &[PathBuf],
    args: &BatchArgs,
    config: &CardscanConfig,
) -> anyhow::Result<Scanners> {
    let lines = CardScanner::new(StaticText::default())
        .with_extractor(build_extractor(config, &args.extraction)?);

    let needs_ocr = files
        .iter()
        .any(|p| input_kind(p) == Some(InputKind::Image));

    let images = if needs_ocr {
        let engine = load_engine(args.model_dir.as_deref(), config)?;
        Some(
            CardScanner::new(engine)
                .with_preprocessor(CardPreprocessor::from_config(&config.preprocessing))
                .with_extractor(build_extractor(config, &args.extraction)?),
        )
    } else {
        None
    };

    Ok(Scanners { lines, images })
}

fn scan_single_file(path: &Path, scanners: &Scanners) -> anyhow::Result<ScanResult> {
    let result = match input_kind(path) {
        Some(InputKind::Lines) => {
            let text = fs::read_to_string(path)?;
            let lines: Vec<&str> = text.lines().collect();
            scanners.lines.scan_lines(&lines)
        }
        Some(InputKind::Image) => {
            let scanner = scanners
                .images
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("OCR engine not loaded"))?;
            scanner.scan_path(path)?
        }
        None => anyhow::bail!("Unsupported file format: {}", path.display()),
    };

    Ok(result)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(export::header());
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    let empty = ContactRecord::new();

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (status, record) = match &result.record {
            Some(record) => ("success", record),
            None => ("error", &empty),
        };
        let time = result.processing_time_ms.to_string();

        let mut row = vec![filename, status];
        row.extend(record.values());
        row.extend([time.as_str(), result.error.as_deref().unwrap_or("")]);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
