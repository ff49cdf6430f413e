//! Error types for the signing client

use thiserror::Error;

/// Main error type for signing operations
#[derive(Debug, Error)]
pub enum AisError {
    /// Malformed signing intent or out-of-bounds configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection or request failure while talking to the service
    #[error("Transport error - {trace_id}: {source}")]
    Transport {
        trace_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success HTTP status
    #[error("Service returned HTTP {status} - {trace_id}: {body}")]
    UnexpectedStatus {
        trace_id: String,
        status: u16,
        body: String,
    },

    /// Terminal response whose result codes map to no known outcome,
    /// or a structurally incomplete response
    #[error("Protocol error - {trace_id}: {summary}")]
    Protocol { trace_id: String, summary: String },

    /// Batched response carries no signature for a prepared document
    #[error("No signature found for document with ID=[{document_id}] - {trace_id}")]
    SignatureMissing {
        trace_id: String,
        document_id: String,
    },

    /// Returned signature does not fit the reserved placeholder
    #[error(
        "Signature of {actual} bytes exceeds the {reserved} bytes reserved \
         for document with ID=[{document_id}]"
    )]
    SignatureTooLarge {
        document_id: String,
        actual: usize,
        reserved: usize,
    },

    /// I/O failure while reading or writing a document
    #[error("Document I/O error on [{path}]: {source}")]
    DocumentIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Finalize or digest lookup against an id that was never prepared
    /// or was already released
    #[error("Unknown document with ID=[{0}]")]
    UnknownDocument(String),

    /// Base64 decode error
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for signing operations
pub type Result<T> = std::result::Result<T, AisError>;
