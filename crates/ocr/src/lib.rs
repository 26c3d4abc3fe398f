pub mod pages;
pub mod pipeline;
pub mod recognizer;

pub use pages::{AggregateError, PageAggregator};
pub use pipeline::{PipelineError, StatementPipeline};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, TextLayerBackend};
