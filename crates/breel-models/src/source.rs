//! Upload source validation.
//!
//! The service only accepts PDF and plain-text documents up to 50 MB,
//! one file per submission. Validation happens here, at construction,
//! so an invalid document can never reach the network layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 50_000_000;

/// Accepted document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Infer the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, SourceError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") => Ok(DocumentKind::PlainText),
            _ => Err(SourceError::UnsupportedType(name.to_string())),
        }
    }

    /// MIME type sent with the upload.
    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::PlainText => write!(f, "plain_text"),
        }
    }
}

/// A validated document ready for upload.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    file_name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl SourceDocument {
    /// Validate and wrap raw document bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SourceError> {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name)?;

        if bytes.is_empty() {
            return Err(SourceError::Empty(file_name));
        }
        if bytes.len() as u64 > MAX_UPLOAD_BYTES {
            return Err(SourceError::TooLarge {
                file_name,
                size: bytes.len() as u64,
            });
        }

        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the document, yielding its name, kind, and bytes.
    pub fn into_parts(self) -> (String, DocumentKind, Vec<u8>) {
        (self.file_name, self.kind, self.bytes)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported document type: {0}, expected .pdf or .txt")]
    UnsupportedType(String),

    #[error("Document {file_name} is {size} bytes, limit is {MAX_UPLOAD_BYTES}")]
    TooLarge { file_name: String, size: u64 },

    #[error("Document {0} is empty")]
    Empty(String),
}
