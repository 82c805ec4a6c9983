//! Transport seam between the client and the HTTP stack.
//!
//! The workflow components never talk to reqwest directly; they go through
//! the [`Transport`] trait, which models exactly what they need from a
//! response: the status code, the reason phrase, and the body bytes. Tests
//! substitute a scripted implementation at this seam.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use printqueue_core::TransportError;
use serde::de::DeserializeOwned;

/// A completed HTTP exchange, reduced to what the workflow logic inspects.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    /// Reason phrase for the status (e.g. "Forbidden"). May be empty.
    pub reason: String,
    pub body: Bytes,
}

impl HttpReply {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// The body as text, lossily decoded. Error bodies on this API are plain
    /// text, so this is the failure detail shown to the user.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport collaborator.
///
/// Implementations must suspend, not block: every call is a cooperative
/// suspension point so concurrently-uploading files interleave freely.
/// Timeout policy belongs to the implementation; callers impose none.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError>;

    /// POST with a JSON body (content-type application/json).
    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<HttpReply, TransportError>;

    /// PUT raw bytes with the given headers, no JSON encoding.
    async fn put_raw(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpReply, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        (**self).get(url).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        (**self).post_json(url, body).await
    }

    async fn put_raw(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpReply, TransportError> {
        (**self).put_raw(url, headers, body).await
    }
}

/// Production transport backed by reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(ReqwestTransport { client })
    }
}

async fn into_reply(response: reqwest::Response) -> Result<HttpReply, TransportError> {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or_default().to_string();
    let body = response
        .bytes()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    Ok(HttpReply {
        status: status.as_u16(),
        reason,
        body,
    })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        into_reply(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        into_reply(response).await
    }

    async fn put_raw(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpReply, TransportError> {
        let mut request = self.client.put(url).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        into_reply(response).await
    }
}
