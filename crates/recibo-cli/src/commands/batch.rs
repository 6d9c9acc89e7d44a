//! Batch command - normalize many captured raw response files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use recibo_core::{NormalizedReceipt, ReceiptNormalizer};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (captured raw responses, JSON)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file triples
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of normalizing a single file.
struct BatchResult {
    path: PathBuf,
    receipt: Option<NormalizedReceipt>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to normalize",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let normalizer = ReceiptNormalizer::with_config(config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match normalize_file(&path, &normalizer) {
            Ok(receipt) => {
                if let Some(ref output_dir) = args.output_dir {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("receipt");
                    let out_path = output_dir.join(format!("{}.triple.json", name));
                    fs::write(&out_path, serde_json::to_string(&receipt)?)?;
                }
                results.push(BatchResult {
                    path,
                    receipt: Some(receipt),
                    error: None,
                });
            }
            Err(e) => {
                if args.continue_on_error {
                    warn!("Failed to normalize {}: {}", path.display(), e);
                    results.push(BatchResult {
                        path,
                        receipt: None,
                        error: Some(e.to_string()),
                    });
                } else {
                    error!("Failed to normalize {}", path.display());
                    return Err(e);
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let ok = results.iter().filter(|r| r.receipt.is_some()).count();
    let failed = results.len() - ok;
    println!(
        "{} Normalized {} files ({} failed) in {:.1?}",
        style("✓").green(),
        ok,
        failed,
        start.elapsed()
    );

    Ok(())
}

fn normalize_file(path: &Path, normalizer: &ReceiptNormalizer) -> anyhow::Result<NormalizedReceipt> {
    let raw = fs::read_to_string(path)?;
    let tree: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(normalizer.normalize(&tree)?)
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["file", "supplier", "dateISO", "total", "error"])?;

    for result in results {
        let file = result.path.display().to_string();
        match (&result.receipt, &result.error) {
            (Some(receipt), _) => {
                let total = receipt
                    .total
                    .map(|t| format!("{:.2}", t))
                    .unwrap_or_default();
                wtr.write_record([
                    file.as_str(),
                    receipt.supplier.as_str(),
                    receipt.date_iso.as_deref().unwrap_or(""),
                    total.as_str(),
                    "",
                ])?;
            }
            (None, error) => {
                let error = error.as_deref().unwrap_or("unknown");
                wtr.write_record([file.as_str(), "", "", "", error])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
