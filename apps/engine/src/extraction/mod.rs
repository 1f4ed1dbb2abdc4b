//! Document Text Extractor: turns an uploaded document into plain text.
//!
//! Extraction never fails the request: a document that cannot be opened or
//! parsed yields an empty string and the downstream tiers work with that.
//! PDF parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`.

pub mod staging;

pub use staging::StagedDocument;

use tracing::{debug, warn};

/// Joins per-page text in document order. Pages with no extractable text contribute nothing.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter_map(|page| {
            let text = page.as_ref().trim_end();
            (!text.trim().is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts text from an in-memory PDF, absorbing parse failures into an empty string.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem_by_pages(bytes) {
        Ok(pages) => {
            debug!("Extracted text from {} PDF page(s)", pages.len());
            join_pages(pages)
        }
        Err(e) => {
            warn!("PDF text extraction failed, continuing with empty text: {e}");
            String::new()
        }
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";

/// PDF content is recognised by its header; the declared extension only decides
/// when the header is absent. Everything else is treated as (lossy) UTF-8 text.
pub fn extract_from_bytes(bytes: &[u8], extension: &str) -> String {
    if bytes.starts_with(PDF_MAGIC) || extension == "pdf" {
        extract_pdf_text(bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Reads the staged upload and extracts its text off the async runtime.
/// A panic inside the PDF parser is absorbed the same way as a parse error.
pub async fn extract_staged(document: &StagedDocument) -> String {
    let bytes = match tokio::fs::read(document.path()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read staged upload: {e}");
            return String::new();
        }
    };
    let extension = document.extension().to_string();

    match tokio::task::spawn_blocking(move || extract_from_bytes(&bytes, &extension)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Text extraction task aborted, continuing with empty text: {e}");
            String::new()
        }
    }
}
