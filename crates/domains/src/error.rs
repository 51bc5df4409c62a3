//! # AppError
//!
//! Centralized error taxonomy for the picstash ecosystem. The ingestion
//! pipeline's partial-failure rules are written against these variants, so
//! adapters must map their own failures onto them rather than invent new
//! types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required credential or setting missing. Raised before any network
    /// call is attempted.
    #[error("{0} not configured")]
    NotConfigured(String),

    /// Network-level failure reaching storage or the tagger.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx response from an upstream service, with its body kept for
    /// diagnostics.
    #[error("upstream rejected request with status {status}: {body}")]
    UpstreamRejection { status: u16, body: String },

    /// Metadata store insert/update failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Bad input (e.g., upload request without a file).
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or unusable caller credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (or not owned by the caller).
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),
}

/// A specialized Result type for picstash logic.
pub type Result<T> = std::result::Result<T, AppError>;
