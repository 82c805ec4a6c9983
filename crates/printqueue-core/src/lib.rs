//! Print Queue Core Library
//!
//! This crate provides the domain models, error types, constants, and
//! configuration shared by the print queue client and CLI. It performs
//! no I/O of its own.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{CatalogError, TransportError, UploadFailure, VerifyError};
pub use models::{
    AccessToken, AccountKind, FileQueueEntry, FinishRequest, IdentityResponse, ListFilesResponse,
    PresignRequest, Route, UploadTicket, View,
};
