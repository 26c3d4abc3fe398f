use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

mod commands;

/// Extract a reconciled ledger, account identity and spending categories
/// from the pages of one bank statement. Prints the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "ledgerlens", author, version, about, long_about = None)]
pub struct Cli {
    /// Page files in page order (text layers, or scans with `--ocr tesseract`)
    #[arg(required = true)]
    pub pages: Vec<PathBuf>,

    /// Statement template (TOML). Built-in relationship-checking layout if omitted
    #[arg(short = 't', long = "template")]
    pub template: Option<PathBuf>,

    /// How page bytes become text
    #[arg(long = "ocr", value_enum, default_value_t = OcrMode::Text)]
    pub ocr: OcrMode,

    /// Tesseract language
    #[arg(long = "lang", default_value = "eng")]
    pub lang: String,

    /// Tesseract data directory
    #[arg(long = "tessdata")]
    pub tessdata: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OcrMode {
    /// Pages are UTF-8 text
    Text,
    /// Pages are images recognized by Tesseract
    Tesseract,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = commands::run(&cli).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("failed to serialize statement result")?;
    println!("{json}");
    Ok(())
}
