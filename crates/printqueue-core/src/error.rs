//! Error types module
//!
//! Every failure the client can hit is a named variant here. Nothing
//! propagates to a global handler; callers turn these into terminal display
//! state (a route, a catalog state, or a per-file upload status).

use thiserror::Error;

/// Failures raised by the transport collaborator itself, before any
/// endpoint-specific interpretation of the response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Identity verification failure. Always routes to the unauthorized view.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("could not verify access token: {reason}")]
    Rejected { status: u16, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Listing failure for the file catalog.
///
/// `Forbidden` (missing token or HTTP 403) gets a distinct "no access"
/// presentation; `Listing` carries the server's reason phrase.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("forbidden")]
    Forbidden,

    #[error("listing files returned {0}")]
    Listing(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Per-file upload failure. Any variant is terminal for that file only;
/// the orchestrator never retries.
#[derive(Debug, Error)]
pub enum UploadFailure {
    #[error("file exceeds the 50 MiB upload limit")]
    TooBig,

    #[error("requesting upload destination failed: {0}")]
    Presign(String),

    #[error("error uploading file: {0}")]
    Transfer(String),

    #[error("error finishing upload: {0}")]
    Finalize(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
