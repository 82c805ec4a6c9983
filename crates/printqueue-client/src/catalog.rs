//! File catalog for the lab view.
//!
//! One fetch per mount, no automatic refresh. The listing is a
//! point-in-time snapshot in the order the server sent it.

use printqueue_core::{CatalogError, FileQueueEntry};

use crate::api::ApiClient;
use crate::transport::Transport;

/// Rendering state of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    /// No access: missing token, or the server answered 403. Distinct from
    /// `Error` so it gets a "no access" message instead of a generic one.
    Forbidden,
    Error(String),
    Loaded(Vec<FileQueueEntry>),
}

impl CatalogState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CatalogState::Loading)
    }
}

/// Fetches the queue listing once and holds the result.
#[derive(Debug, Default)]
pub struct FileCatalog {
    state: CatalogState,
}

impl FileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Fetch the listing. A client without a token resolves to `Forbidden`
    /// without issuing any network call. Calling again after the state has
    /// resolved does nothing.
    pub async fn fetch<T: Transport>(&mut self, api: &ApiClient<T>) -> &CatalogState {
        if self.state.is_resolved() {
            return &self.state;
        }

        if !api.token().is_present() {
            self.state = CatalogState::Forbidden;
            return &self.state;
        }

        self.state = match api.list_files().await {
            Ok(files) => CatalogState::Loaded(files),
            Err(CatalogError::Forbidden) => CatalogState::Forbidden,
            Err(err) => {
                tracing::warn!(error = %err, "loading file listing failed");
                CatalogState::Error(err.to_string())
            }
        };

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::MockTransport;
    use printqueue_core::AccessToken;

    fn api(transport: MockTransport, token: AccessToken) -> ApiClient<MockTransport> {
        ApiClient::new(transport, "http://api.test", token)
    }

    #[tokio::test]
    async fn missing_token_is_forbidden_without_network() {
        let api = api(MockTransport::new(), AccessToken::none());
        let mut catalog = FileCatalog::new();
        assert_eq!(catalog.state(), &CatalogState::Loading);

        let state = catalog.fetch(&api).await;
        assert_eq!(state, &CatalogState::Forbidden);
        assert_eq!(api.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn rejected_token_is_forbidden() {
        let api = api(
            MockTransport::new().reply("/api/files", 403, "Forbidden"),
            AccessToken::new("bad"),
        );
        let mut catalog = FileCatalog::new();
        assert_eq!(catalog.fetch(&api).await, &CatalogState::Forbidden);
    }

    #[tokio::test]
    async fn server_error_carries_the_reason_phrase() {
        let api = api(
            MockTransport::new().reply("/api/files", 500, "boom"),
            AccessToken::new("tok"),
        );
        let mut catalog = FileCatalog::new();
        match catalog.fetch(&api).await {
            CatalogState::Error(message) => {
                assert_eq!(message, "listing files returned Internal Server Error")
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn loads_entries_verbatim_and_only_fetches_once() {
        let body = r#"{"files":[
            {"name":"new.stl","downloadLink":"https://s/new","created":"2024-05-02T00:00:00Z","uploader":"a@x"},
            {"name":"old.stl","downloadLink":"https://s/old","created":"2024-05-01T00:00:00Z","uploader":"anonymous"}
        ]}"#;
        let api = api(
            MockTransport::new().reply("/api/files", 200, body),
            AccessToken::new("tok"),
        );
        let mut catalog = FileCatalog::new();

        match catalog.fetch(&api).await {
            CatalogState::Loaded(files) => {
                assert_eq!(files.len(), 2);
                assert_eq!(files[0].name, "new.stl");
            }
            other => panic!("unexpected state: {other:?}"),
        }

        // one fetch per mount
        catalog.fetch(&api).await;
        assert_eq!(api.transport().call_count(), 1);
    }
}
