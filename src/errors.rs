//! Error types for LeadPilot
//!
//! One crate-wide error enum; the REPL and binary wrap it in anyhow.

use thiserror::Error;

/// Main error type for lead management and the chat client
#[derive(Error, Debug)]
pub enum LeadError {
    /// A candidate lead failed form validation
    #[error("Missing information: {0}")]
    Validation(String),

    /// No lead matches the given id
    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    /// An id prefix matches more than one lead
    #[error("Lead id '{prefix}' is ambiguous ({matches} leads match)")]
    AmbiguousLeadId { prefix: String, matches: usize },

    /// Document upload with a MIME type other than PDF or DOCX
    #[error("Invalid file type '{mime_type}': please upload a PDF or DOCX file")]
    UnsupportedDocument { mime_type: String },

    /// Chat message lookup errors
    #[error("Chat message not found: {0}")]
    MessageNotFound(String),

    /// Attempt to change the text of a finished message
    #[error("Chat message {0} is finalized and can no longer change")]
    MessageFinalized(String),

    /// Streaming errors
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Local file access errors (document uploads)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("LeadPilot error: {0}")]
    Generic(String),
}

/// Result type alias for lead operations
pub type Result<T> = std::result::Result<T, LeadError>;
