//! Domain and wire types for the print queue API.
//!
//! Field names follow the backend's JSON contract verbatim; see the
//! individual types for the endpoint each belongs to.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LAB_PATH;

/// Account kind returned by the identity endpoint (`GET /api/me`).
///
/// `up` tokens may upload, `down` tokens may list the lab queue. Any other
/// value the backend may introduce deserializes as `Other` and authorizes
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Up,
    Down,
    #[serde(other)]
    Other,
}

/// Response body of `GET /api/me?access_token=T`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityResponse {
    #[serde(rename = "type")]
    pub kind: AccountKind,
}

/// The view the interface should display once authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upload,
    Lab,
}

/// The view the caller requested, derived from the page path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Lab,
}

impl View {
    /// `/lab` selects the lab view; any other path selects the upload view.
    pub fn from_path(path: &str) -> Self {
        if path == LAB_PATH {
            View::Lab
        } else {
            View::Upload
        }
    }
}

/// One entry in the file queue listing. Owned by the backend; the listing is
/// a point-in-time snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileQueueEntry {
    pub name: String,
    #[serde(rename = "downloadLink")]
    pub download_link: String,
    pub created: DateTime<Utc>,
    pub uploader: String,
}

/// Response body of `GET /api/files?access_token=T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileQueueEntry>,
}

/// Request body of `POST /api/upload?access_token=T`.
#[derive(Debug, Clone, Serialize)]
pub struct PresignRequest {
    pub filename: String,
    pub email: String,
}

/// A presigned destination issued by the presign endpoint.
///
/// `id` is opaque to the client and is echoed back on finalize. `headers`
/// must accompany the raw PUT to `url`. A ticket lives only for the duration
/// of one upload attempt and is never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTicket {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Request body of `POST /api/finish?access_token=T`.
#[derive(Debug, Clone, Serialize)]
pub struct FinishRequest {
    pub id: String,
    pub email: String,
}

/// Opaque access credential carried as the `access_token` query parameter.
///
/// An absent parameter and an empty string are both normalized to "no token"
/// so the two cases cannot diverge anywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessToken(Option<String>);

impl AccessToken {
    /// Wrap a raw token value. Empty input means "no token".
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            AccessToken(None)
        } else {
            AccessToken(Some(raw))
        }
    }

    /// The "no token" value.
    pub fn none() -> Self {
        AccessToken(None)
    }

    /// Extract the token from a raw query string (`a=1&access_token=xyz`).
    ///
    /// A leading `?` is tolerated. Percent-encoding is decoded; a key that is
    /// missing or has an empty value yields "no token".
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&') {
            let mut parts = pair.splitn(2, '=');
            if parts.next() != Some("access_token") {
                continue;
            }
            let value = parts.next().unwrap_or("");
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            return AccessToken::new(decoded);
        }
        AccessToken(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}
