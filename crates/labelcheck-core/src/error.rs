//! Error types for the labelcheck-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the labelcheck library.
#[derive(Error, Debug)]
pub enum LabelCheckError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Email parsing error.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// Cover page or merge failure.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Field comparison could not run.
    #[error("comparison error: {0}")]
    Comparison(#[from] ComparisonError),

    /// Inference error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] labelcheck_inference::InferenceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a single text-extraction backend.
///
/// The backend chain absorbs these; they only surface in logs.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The underlying parser panicked.
    #[error("{backend} backend panicked")]
    Panicked { backend: &'static str },
}

/// Errors related to MIME email parsing.
#[derive(Error, Debug)]
pub enum EmailError {
    /// The message could not be parsed as MIME.
    #[error("failed to parse email: {0}")]
    Parse(String),

    /// A part body could not be decoded.
    #[error("failed to decode part '{part}': {reason}")]
    Decode { part: String, reason: String },
}

/// Errors building the cover page or the merged PDF.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// The generated cover page could not be built.
    #[error("failed to build cover page: {0}")]
    CoverPage(String),

    /// Attachments could not be merged into one document.
    #[error("failed to merge PDFs: {0}")]
    Merge(String),

    /// Serializing the merged document failed.
    #[error("failed to write merged PDF: {0}")]
    Write(String),
}

/// Errors reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that abort comparison mode.
#[derive(Error, Debug)]
pub enum ComparisonError {
    /// No embedding model could be loaded from any configured path.
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),
}

/// Result type for the labelcheck library.
pub type Result<T> = std::result::Result<T, LabelCheckError>;
