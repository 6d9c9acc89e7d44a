//! Process command - run one receipt image end to end.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use recibo_core::ReceiptPipeline;
use recibo_recognition::{HttpRecognitionClient, decode_image_payload};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file: a receipt image, or base64 text with --b64
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input file as base64 text (a browser-captured payload)
    #[arg(long)]
    b64: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include the diagnostic report (discovered keys, scored candidates)
    #[arg(long)]
    debug: bool,

    /// Also write the raw recognition response to this path
    #[arg(long)]
    raw: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let image = if args.b64 {
        let text = fs::read_to_string(&args.input)?;
        decode_image_payload(&text, config.min_image_base64_len)?
    } else {
        fs::read(&args.input)?
    };

    info!("Submitting {} bytes for recognition", image.len());

    let client = HttpRecognitionClient::from_env()?;
    let pipeline = ReceiptPipeline::with_config(client, config);
    let (report, tree) = pipeline.process_with_report(&image)?;

    if let Some(raw_path) = &args.raw {
        fs::write(raw_path, serde_json::to_string_pretty(&tree)?)?;
        println!(
            "{} Raw response written to {}",
            style("✓").green(),
            raw_path.display()
        );
    }

    let output = if args.debug {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report.receipt)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}
