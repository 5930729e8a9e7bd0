//! Content acquisition: turn a source string into document text
//!
//! Sources starting with `http` go to the injected [`PageRenderer`];
//! otherwise the file extension picks the reader (`.pdf` or `.txt`).

use crate::error::ExtractorError;
use claimsift_domain::traits::PageRenderer;
use claimsift_domain::Document;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Kind of source, decided from the source string alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A web page
    Url,
    /// A local PDF file
    Pdf,
    /// A local plain-text file
    Text,
}

impl SourceKind {
    /// Classify a source, or `None` if no reader handles it
    pub fn detect(source: &str) -> Option<Self> {
        if source.starts_with("http") {
            return Some(SourceKind::Url);
        }
        let extension = Path::new(source)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("pdf") => Some(SourceKind::Pdf),
            Some("txt") => Some(SourceKind::Text),
            _ => None,
        }
    }
}

/// Loads document text from URLs, PDF files and text files
#[derive(Clone, Default)]
pub struct DocumentLoader {
    renderer: Option<Arc<dyn PageRenderer + Send + Sync>>,
}

impl DocumentLoader {
    /// Create a loader without URL support
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `renderer` for `http` sources
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer + Send + Sync>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Fetch the full text of `source`
    pub fn get_content(&self, source: &str) -> Result<String, ExtractorError> {
        let kind = SourceKind::detect(source)
            .ok_or_else(|| ExtractorError::UnsupportedSource(source.to_string()))?;
        debug!(source, ?kind, "Loading content");

        match kind {
            SourceKind::Url => {
                let renderer = self.renderer.as_ref().ok_or_else(|| {
                    ExtractorError::Content(format!("no page renderer configured for {}", source))
                })?;
                renderer
                    .body_text(source)
                    .map_err(|e| ExtractorError::Content(format!("{}: {}", source, e)))
            }
            SourceKind::Pdf => read_pdf(Path::new(source)),
            SourceKind::Text => std::fs::read_to_string(source)
                .map_err(|e| ExtractorError::Content(format!("{}: {}", source, e))),
        }
    }

    /// Fetch `source` as a [`Document`]
    pub fn load(&self, source: &str) -> Result<Document, ExtractorError> {
        Ok(Document::new(source, self.get_content(source)?))
    }
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLoader")
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<String, ExtractorError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ExtractorError::Content(format!("{}: {}", path.display(), e)))?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        ExtractorError::Content(format!("failed to read PDF {}: {}", path.display(), e))
    })
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<String, ExtractorError> {
    Err(ExtractorError::Content(format!(
        "PDF support not enabled, cannot read {}",
        path.display()
    )))
}
