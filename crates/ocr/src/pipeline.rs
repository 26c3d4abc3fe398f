use std::path::PathBuf;
use std::sync::Arc;

use ledgerlens_core::StatementResult;
use ledgerlens_import::StatementParser;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::pages::{AggregateError, PageAggregator};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Page aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("Page worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("No pages supplied")]
    NoPages,
}

/// Orchestrates: recognize every page concurrently → barrier → join → parse.
pub struct StatementPipeline<R: OcrBackend> {
    recognizer: Arc<R>,
    parser: Arc<StatementParser>,
}

impl<R: OcrBackend + 'static> StatementPipeline<R> {
    pub fn new(recognizer: R, parser: StatementParser) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            parser: Arc::new(parser),
        }
    }

    /// Process page files on disk; position in `paths` is the page index.
    pub async fn process_files(&self, paths: &[PathBuf]) -> Result<StatementResult, PipelineError> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            pages.push(tokio::fs::read(path).await?);
        }
        self.process_pages(pages).await
    }

    /// Process raw page bytes; position in `pages` is the page index.
    ///
    /// Pages are recognized on the blocking pool and may finish in any order.
    /// Parsing starts only after every page has been submitted.
    pub async fn process_pages(
        &self,
        pages: Vec<Vec<u8>>,
    ) -> Result<StatementResult, PipelineError> {
        if pages.is_empty() {
            return Err(PipelineError::NoPages);
        }
        let aggregator = Arc::new(PageAggregator::with_expected(pages.len()));

        let mut workers = JoinSet::new();
        for (index, bytes) in pages.into_iter().enumerate() {
            let recognizer = Arc::clone(&self.recognizer);
            let aggregator = Arc::clone(&aggregator);
            workers.spawn_blocking(move || {
                let text = recognizer.recognize(&bytes).map_err(|e| {
                    tracing::warn!(page = index, error = %e, "page recognition failed");
                    e
                })?;
                tracing::debug!(page = index, chars = text.len(), "page recognized");
                aggregator.submit(index, text);
                Ok::<_, OcrError>(())
            });
        }
        while let Some(outcome) = workers.join_next().await {
            outcome??;
        }

        aggregator.wait_until_complete().await;
        let document = aggregator.join()?;
        Ok(self.parser.parse(&document))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
