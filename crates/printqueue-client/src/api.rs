//! API client for the print queue backend.
//!
//! One method per backend endpoint, each returning the typed success payload
//! or the named failure for that step. The access token rides along as the
//! `access_token` query credential on every API call; the transfer PUT goes
//! to the presigned destination instead and authorizes with the ticket's
//! headers.

use bytes::Bytes;
use printqueue_core::{
    AccessToken, AccountKind, CatalogError, ClientConfig, FileQueueEntry, FinishRequest,
    IdentityResponse, ListFilesResponse, PresignRequest, TransportError, UploadFailure,
    UploadTicket, VerifyError,
};

use crate::transport::Transport;

/// HTTP client for the print queue API.
#[derive(Debug)]
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
    token: AccessToken,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, token: AccessToken) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            transport,
            base_url,
            token,
        }
    }

    /// Build a client from environment configuration.
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::new(transport, config.api_url.clone(), config.token.clone())
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API endpoint URL with the token attached as the query credential.
    fn endpoint(&self, path: &str) -> String {
        match self.token.as_str() {
            Some(token) => format!(
                "{}{}?access_token={}",
                self.base_url,
                path,
                urlencoding::encode(token)
            ),
            None => format!("{}{}", self.base_url, path),
        }
    }

    /// `GET /api/me` — verify the token and learn what it authorizes.
    pub async fn verify_identity(&self) -> Result<AccountKind, VerifyError> {
        let reply = self.transport.get(&self.endpoint("/api/me")).await?;
        if !reply.ok() {
            tracing::warn!(status = reply.status, "identity verification rejected");
            return Err(VerifyError::Rejected {
                status: reply.status,
                reason: reply.reason,
            });
        }

        let identity: IdentityResponse = reply.json()?;
        tracing::debug!(kind = ?identity.kind, "identity verified");
        Ok(identity.kind)
    }

    /// `GET /api/files` — fetch the current queue snapshot.
    ///
    /// Entries come back in the order the server sent them (newest first);
    /// no client-side sorting or filtering.
    pub async fn list_files(&self) -> Result<Vec<FileQueueEntry>, CatalogError> {
        let reply = self.transport.get(&self.endpoint("/api/files")).await?;
        if reply.ok() {
            let listing: ListFilesResponse = reply.json().map_err(CatalogError::Transport)?;
            tracing::debug!(count = listing.files.len(), "listed queue files");
            return Ok(listing.files);
        }

        if reply.status == 403 {
            return Err(CatalogError::Forbidden);
        }
        Err(CatalogError::Listing(reply.reason))
    }

    /// `POST /api/upload` — request a presigned destination for one file.
    pub async fn request_upload(
        &self,
        filename: &str,
        email: &str,
    ) -> Result<UploadTicket, UploadFailure> {
        let body = serde_json::to_value(PresignRequest {
            filename: filename.to_string(),
            email: email.to_string(),
        })
        .map_err(|e| TransportError::Decode(e.to_string()))?;

        let reply = self
            .transport
            .post_json(&self.endpoint("/api/upload"), body)
            .await?;
        if !reply.ok() {
            return Err(UploadFailure::Presign(reply.text()));
        }

        let ticket: UploadTicket = reply.json()?;
        tracing::debug!(filename, id = %ticket.id, "obtained upload ticket");
        Ok(ticket)
    }

    /// PUT the raw file bytes to the ticket's presigned destination.
    pub async fn transfer(&self, ticket: &UploadTicket, content: Bytes) -> Result<(), UploadFailure> {
        let reply = self
            .transport
            .put_raw(&ticket.url, &ticket.headers, content)
            .await?;
        if !reply.ok() {
            return Err(UploadFailure::Transfer(reply.text()));
        }
        Ok(())
    }

    /// `POST /api/finish` — confirm a completed transfer so the file shows
    /// up in the catalog.
    pub async fn finish_upload(&self, id: &str, email: &str) -> Result<(), UploadFailure> {
        let body = serde_json::to_value(FinishRequest {
            id: id.to_string(),
            email: email.to_string(),
        })
        .map_err(|e| TransportError::Decode(e.to_string()))?;

        let reply = self
            .transport
            .post_json(&self.endpoint("/api/finish"), body)
            .await?;
        if !reply.ok() {
            return Err(UploadFailure::Finalize(reply.text()));
        }
        Ok(())
    }
}
