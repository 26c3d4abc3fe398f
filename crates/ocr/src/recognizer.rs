use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Page decode error: {0}")]
    Decode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: build with the `tesseract` feature")]
    NotAvailable,
}

/// Turns one page's raw bytes into text.
/// Called from blocking worker threads, one call per page.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, page_bytes: &[u8]) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string for every page.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _page_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Text-layer backend ────────────────────────────────────────────────────────

/// Pages that already carry a text layer (exported `.txt` per page).
/// Bytes must be UTF-8; a NUL-padded tail is trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayerBackend;

impl OcrBackend for TextLayerBackend {
    fn recognize(&self, page_bytes: &[u8]) -> Result<String, OcrError> {
        let text = std::str::from_utf8(page_bytes).map_err(|e| OcrError::Decode(e.to_string()))?;
        Ok(text.trim_end_matches('\0').to_string())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    /// Scanned page images (PNG/JPEG/TIFF) through libtesseract.
    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, page_bytes: &[u8]) -> Result<String, OcrError> {
            // LepTess is not Sync; each page gets its own engine handle.
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(page_bytes)
                .map_err(|e| OcrError::Decode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
