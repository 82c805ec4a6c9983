//! HTTP client for the print queue service.
//!
//! Provides the transport seam ([`Transport`], [`ReqwestTransport`]), the
//! API client ([`ApiClient`]), and the three stateful workflow components:
//! access verification/routing ([`access::AccessController`]), the file
//! catalog ([`catalog::FileCatalog`]), and the multi-file upload
//! orchestrator ([`upload::UploadQueue`]).

pub mod access;
pub mod api;
pub mod catalog;
pub mod transport;
pub mod upload;

pub use access::{resolve_route, AccessController, AccessState};
pub use api::ApiClient;
pub use catalog::{CatalogState, FileCatalog};
pub use transport::{HttpReply, ReqwestTransport, Transport};
pub use upload::{LocalFile, UploadQueue, UploadStatus, UploadUnit};

// Re-export core types callers need alongside the client.
pub use printqueue_core::{
    AccessToken, AccountKind, CatalogError, ClientConfig, FileQueueEntry, Route, TransportError,
    UploadFailure, UploadTicket, VerifyError, View,
};
