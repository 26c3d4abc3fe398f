use std::path::Path;

use anyhow::{Context, Result};
use ledgerlens_core::StatementResult;
use ledgerlens_import::StatementParser;
use ledgerlens_ocr::{OcrBackend, StatementPipeline, TextLayerBackend};

use crate::{Cli, OcrMode};

/// Built-in template unless a TOML file is given.
pub fn load_parser(template: Option<&Path>) -> Result<StatementParser> {
    let Some(path) = template else {
        return Ok(StatementParser::builtin());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template {}", path.display()))?;
    let parser = StatementParser::from_toml(&content)
        .with_context(|| format!("invalid template {}", path.display()))?;
    tracing::info!(template = %path.display(), "template loaded");
    Ok(parser)
}

pub async fn run(cli: &Cli) -> Result<StatementResult> {
    let parser = load_parser(cli.template.as_deref())?;
    tracing::info!(pages = cli.pages.len(), ocr = ?cli.ocr, "processing statement");

    match cli.ocr {
        OcrMode::Text => process(TextLayerBackend, parser, cli).await,
        OcrMode::Tesseract => tesseract(parser, cli).await,
    }
}

async fn process<R: OcrBackend + 'static>(
    recognizer: R,
    parser: StatementParser,
    cli: &Cli,
) -> Result<StatementResult> {
    let pipeline = StatementPipeline::new(recognizer, parser);
    let result = pipeline
        .process_files(&cli.pages)
        .await
        .context("statement processing failed")?;
    tracing::info!(
        transactions = result.transactions.len(),
        digest = %result.document_digest,
        "statement extracted"
    );
    Ok(result)
}

#[cfg(feature = "tesseract")]
async fn tesseract(parser: StatementParser, cli: &Cli) -> Result<StatementResult> {
    use ledgerlens_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    let recognizer = TesseractRecognizer::new(cli.tessdata.clone(), &cli.lang);
    process(recognizer, parser, cli).await
}

#[cfg(not(feature = "tesseract"))]
async fn tesseract(_parser: StatementParser, _cli: &Cli) -> Result<StatementResult> {
    Err(ledgerlens_ocr::OcrError::NotAvailable.into())
}
