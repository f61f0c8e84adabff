use shared::domain::RecordId;
use thiserror::Error;

/// Failure below the application layer: the request never produced a usable
/// JSON body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed response body from {url}: {message}")]
    MalformedBody { url: String, message: String },
}

/// Local failure raised before any request is sent.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("no editor registered for record {0}")]
    UnknownRecord(RecordId),
    #[error("input element '{element_id}' is missing")]
    MissingField { element_id: String },
    #[error("cannot address a record below '{url}'")]
    InvalidTarget { url: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
