//! Document loader: turns an uploaded file into the plain text the engine consumes.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Unsupported file format: {0} (expected .pdf, .txt or .md)")]
    UnsupportedFormat(String),

    #[error("File {0} is not valid UTF-8 text")]
    InvalidUtf8(String),

    #[error("Could not extract text from PDF {file}: {reason}")]
    Pdf { file: String, reason: String },
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Extracts plain text from `bytes` based on the extension of `file_name`.
/// Files without an extension are treated as plain text.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, LoaderError> {
    let text = match extension(file_name).as_deref() {
        Some("pdf") => pdf_extract::extract_text_from_mem(bytes).map_err(|e| LoaderError::Pdf {
            file: file_name.to_string(),
            reason: e.to_string(),
        })?,
        Some("txt") | Some("md") | None => String::from_utf8(bytes.to_vec())
            .map_err(|_| LoaderError::InvalidUtf8(file_name.to_string()))?,
        Some(other) => return Err(LoaderError::UnsupportedFormat(format!(".{other}"))),
    };

    debug!("Loaded {} ({} bytes → {} chars)", file_name, bytes.len(), text.chars().count());
    Ok(text)
}
