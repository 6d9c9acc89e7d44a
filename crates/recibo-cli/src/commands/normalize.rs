//! Normalize command - normalize one captured raw response file.
//!
//! This is the offline half of the workflow: `process --raw` captures what
//! the service returned, and this command replays normalization over it
//! while the scoring configuration is tuned.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use recibo_core::ReceiptNormalizer;

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Captured raw recognition response (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include the diagnostic report (discovered keys, scored candidates)
    #[arg(long)]
    debug: bool,
}

pub fn run(args: NormalizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let raw = fs::read_to_string(&args.input)?;
    let tree: serde_json::Value = serde_json::from_str(&raw)?;

    let normalizer = ReceiptNormalizer::with_config(config);
    let report = normalizer.normalize_with_report(&tree)?;

    let output = if args.debug {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report.receipt)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
        }
        None => println!("{}", output),
    }

    Ok(())
}
