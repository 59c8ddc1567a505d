//! Scan command - extract contact details from a single card.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardscan_core::models::config::CardscanConfig;
use cardscan_core::models::contact::ContactRecord;
use cardscan_core::{export, CardPreprocessor, CardScanner, ScanResult, StaticText};

use super::{build_extractor, format_record_text, input_kind, load_config, load_engine};
use super::{ExtractionArgs, InputKind};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (card image, or .txt with one recognized line per line)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Print the recognized lines to stderr
    #[arg(long)]
    show_lines: bool,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV spreadsheet (header row plus one data row)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let kind = input_kind(&args.input).ok_or_else(|| {
        anyhow::anyhow!("Unsupported file format: {}", args.input.display())
    })?;

    info!("Scanning file: {}", args.input.display());

    let result = match kind {
        InputKind::Lines => scan_lines_file(&args, &config)?,
        InputKind::Image => scan_image(&args, &config)?,
    };

    if args.show_lines {
        eprintln!("{}", style("Recognized lines:").blue());
        for line in &result.lines {
            eprintln!("  {}", line);
        }
    }

    if result.no_text() {
        eprintln!("{} No text detected", style("⚠").yellow());
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        let path = resolve_output_path(output_path, args.format);
        fs::write(&path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn scan_lines_file(args: &ScanArgs, config: &CardscanConfig) -> anyhow::Result<ScanResult> {
    let text = fs::read_to_string(&args.input)?;
    let lines: Vec<&str> = text.lines().collect();

    let scanner = CardScanner::new(StaticText::default())
        .with_extractor(build_extractor(config, &args.extraction)?);

    Ok(scanner.scan_lines(&lines))
}

fn scan_image(args: &ScanArgs, config: &CardscanConfig) -> anyhow::Result<ScanResult> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );

    pb.set_message("Loading OCR models...");
    let engine = load_engine(args.model_dir.as_deref(), config)?;

    let scanner = CardScanner::new(engine)
        .with_preprocessor(CardPreprocessor::from_config(&config.preprocessing))
        .with_extractor(build_extractor(config, &args.extraction)?);

    pb.set_message("Running OCR...");
    let result = scanner.scan_path(&args.input)?;

    pb.finish_with_message("Done");
    Ok(result)
}

/// Render a record in the requested format.
pub fn format_record(record: &ContactRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(export::to_json(record)?),
        OutputFormat::Csv => Ok(export::to_csv_string(record)?),
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

/// A directory output gets a timestamped file name inside it.
fn resolve_output_path(output: &Path, format: OutputFormat) -> PathBuf {
    if output.is_dir() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        output.join(format!("contact_{}.{}", stamp, format.extension()))
    } else {
        output.to_path_buf()
    }
}
