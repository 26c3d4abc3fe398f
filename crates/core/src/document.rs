use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Text recovered from one page by OCR or text-layer extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub index: usize,
    pub text: String,
}

impl PageText {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self { index, text: text.into() }
    }
}

/// The whole statement: every page's text in index order, joined by a single space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText(String);

impl DocumentText {
    pub const PAGE_SEPARATOR: &'static str = " ";

    /// Join pages by index. The caller's slice order is irrelevant.
    pub fn from_pages(pages: &[PageText]) -> Self {
        let mut ordered: Vec<&PageText> = pages.iter().collect();
        ordered.sort_by_key(|p| p.index);
        let joined = ordered
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(Self::PAGE_SEPARATOR);
        DocumentText(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex SHA-256 of the joined text (64 chars).
    pub fn digest_hex(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let hash: [u8; 32] = hasher.finalize().into();
        hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl From<String> for DocumentText {
    fn from(text: String) -> Self {
        DocumentText(text)
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        DocumentText(text.to_string())
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
