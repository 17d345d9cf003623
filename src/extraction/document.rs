//! Clinical PDF text extraction with upfront format validation.
//!
//! The byte stream is rejected before parsing when it is empty or
//! lacks the `%PDF-` magic. Parser failures are classified by keyword
//! inspection of the underlying error text so the caller can tell
//! "try a different file" apart from a generic parse failure.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no document provided")]
    Empty,
    #[error("file does not look like a valid PDF")]
    NotPdf,
    #[error("PDF parsing failed: {0}")]
    Parse(String),
}

/// Bad XRef, format errors, encryption markers and similar signatures
/// in the parser's error text.
static UNREADABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)xref|formaterror|bad\s|password|encrypted|invalid|corrupt|malformed")
        .expect("valid pdf-error regex")
});

impl DocumentError {
    /// User-facing message for the boundary layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty => "No PDF file provided".to_string(),
            Self::NotPdf => "File does not look like a valid PDF".to_string(),
            Self::Parse(detail) if UNREADABLE_RE.is_match(detail) => {
                "This PDF could not be read. It may be corrupted, password-protected, \
                 or in a format we don't support. Try a different file or re-save the PDF."
                    .to_string()
            }
            Self::Parse(_) => "Failed to parse PDF".to_string(),
        }
    }
}

/// Extract the text layer from an in-memory PDF.
///
/// CPU-bound; the boundary layer runs this under `spawn_blocking`.
pub fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    if bytes.is_empty() {
        return Err(DocumentError::Empty);
    }
    if bytes.len() < PDF_MAGIC.len() || !bytes.starts_with(PDF_MAGIC) {
        return Err(DocumentError::NotPdf);
    }
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))
}

/// Build a minimal single-page PDF for tests, via lopdf (the library
/// pdf-extract uses internally).
#[cfg(test)]
pub(crate) fn make_test_pdf(text: &str) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });

    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
        dict.set("Parent", pages_id);
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
