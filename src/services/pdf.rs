use std::path::Path;
use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Training document not found at {0}")]
    Missing(String),

    #[error("Failed to extract PDF text: {0}")]
    Extract(#[from] pdf_extract::OutputError),
}

impl From<PdfError> for AppError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Missing(path) => {
                AppError::NotFound(format!("Training material PDF not found: {}", path))
            }
            PdfError::Extract(err) => {
                AppError::Validation(format!("Could not extract text from PDF: {}", err))
            }
        }
    }
}

/// Extract the text of the stored training document.
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    if !path.exists() {
        return Err(PdfError::Missing(path.display().to_string()));
    }
    Ok(pdf_extract::extract_text(path)?)
}

/// Extract text from an uploaded document held in memory. The buffer is
/// dropped with the request, so there is no temp file to clean up.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, PdfError> {
    Ok(pdf_extract::extract_text_from_mem(bytes)?)
}
