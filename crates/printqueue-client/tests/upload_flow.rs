//! End-to-end batch scenarios against a scripted transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use printqueue_client::{
    AccessController, AccessState, AccessToken, ApiClient, CatalogState, FileCatalog, HttpReply,
    LocalFile, Route, Transport, TransportError, UploadQueue, UploadStatus, View,
};

/// Minimal scripted backend: one response per endpoint, every request logged.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<HashMap<&'static str, (u16, String)>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn script(self: &Arc<Self>, needle: &'static str, status: u16, body: &str) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .insert(needle, (status, body.to_string()));
        Arc::clone(self)
    }

    fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn answer(&self, method: &str, url: &str) -> HttpReply {
        self.log.lock().unwrap().push(format!("{method} {url}"));

        let responses = self.responses.lock().unwrap();
        for (needle, (status, body)) in responses.iter() {
            if url.contains(needle) {
                return HttpReply {
                    status: *status,
                    reason: match *status {
                        403 => "Forbidden".to_string(),
                        500 => "Internal Server Error".to_string(),
                        _ => "OK".to_string(),
                    },
                    body: Bytes::from(body.clone()),
                };
            }
        }
        HttpReply {
            status: 404,
            reason: "Not Found".to_string(),
            body: Bytes::new(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        Ok(self.answer("GET", url))
    }

    async fn post_json(
        &self,
        url: &str,
        _body: serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        Ok(self.answer("POST", url))
    }

    async fn put_raw(
        &self,
        url: &str,
        _headers: &HashMap<String, String>,
        _body: Bytes,
    ) -> Result<HttpReply, TransportError> {
        Ok(self.answer("PUT", url))
    }
}

const TICKET: &str = r#"{"id":"abc/part.stl","url":"https://storage.test/put","headers":{"X-Goog-Content-Length-Range":"0,52428800"}}"#;

fn client(backend: Arc<ScriptedBackend>, token: AccessToken) -> ApiClient<Arc<ScriptedBackend>> {
    ApiClient::new(backend, "http://queue.test", token)
}

#[tokio::test]
async fn authorized_session_uploads_a_mixed_batch() {
    let backend = ScriptedBackend::new()
        .script("/api/me", 200, r#"{"type":"up"}"#)
        .script("/api/upload", 200, TICKET)
        .script("storage.test/put", 200, "")
        .script("/api/finish", 200, "{}");
    let api = client(Arc::clone(&backend), AccessToken::new("up-token"));

    let mut controller = AccessController::new();
    let state = controller.verify(&api, View::from_path("/")).await;
    assert_eq!(state, &AccessState::Authorized(Route::Upload));

    let mut queue = UploadQueue::new();
    queue.add_files([
        LocalFile::new("small.stl", Bytes::from_static(b"solid small")),
        LocalFile {
            name: "sixty-mb.stl".to_string(),
            size: 60 * 1024 * 1024,
            content: Bytes::new(),
        },
    ]);
    queue.drive(&api, "visitor@example.com").await;

    assert_eq!(queue.units()[0].status(), &UploadStatus::Succeeded);
    assert_eq!(queue.units()[1].status(), &UploadStatus::FailedTooBig);

    // identity + presign + transfer + finalize; nothing for the big file
    let requests = backend.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[1].starts_with("POST http://queue.test/api/upload"));
    assert_eq!(requests[2], "PUT https://storage.test/put");
    assert!(requests[3].starts_with("POST http://queue.test/api/finish"));
}

#[tokio::test]
async fn lab_session_lists_the_queue() {
    let listing = r#"{"files":[
        {"name":"fresh.stl","downloadLink":"https://storage.test/get/fresh","created":"2024-06-02T10:00:00Z","uploader":"a@example.com"},
        {"name":"older.stl","downloadLink":"https://storage.test/get/older","created":"2024-06-01T10:00:00Z","uploader":"anonymous"}
    ]}"#;
    let backend = ScriptedBackend::new()
        .script("/api/me", 200, r#"{"type":"down"}"#)
        .script("/api/files", 200, listing);
    let api = client(backend, AccessToken::new("down-token"));

    let mut controller = AccessController::new();
    assert_eq!(
        controller.verify(&api, View::from_path("/lab")).await,
        &AccessState::Authorized(Route::Lab)
    );

    let mut catalog = FileCatalog::new();
    match catalog.fetch(&api).await {
        CatalogState::Loaded(files) => {
            assert_eq!(files.len(), 2);
            assert_eq!(files[0].name, "fresh.stl");
            assert_eq!(files[1].uploader, "anonymous");
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn upload_token_cannot_open_the_lab_view() {
    let backend = ScriptedBackend::new().script("/api/me", 200, r#"{"type":"up"}"#);
    let api = client(backend, AccessToken::new("up-token"));

    let mut controller = AccessController::new();
    assert_eq!(
        controller.verify(&api, View::from_path("/lab")).await,
        &AccessState::Unauthorized(None)
    );
}

#[tokio::test]
async fn token_less_visit_is_unauthorized_and_cannot_list() {
    let backend = ScriptedBackend::new().script("/api/me", 200, r#"{"type":"up"}"#);
    let api = client(Arc::clone(&backend), AccessToken::from_query("foo=bar"));

    let mut controller = AccessController::new();
    assert_eq!(
        controller.verify(&api, View::from_path("/")).await,
        &AccessState::Unauthorized(None)
    );
    // exactly the single verification attempt
    assert_eq!(backend.requests().len(), 1);

    let mut catalog = FileCatalog::new();
    assert_eq!(catalog.fetch(&api).await, &CatalogState::Forbidden);
    assert_eq!(backend.requests().len(), 1, "no listing call without a token");
}

#[tokio::test]
async fn batch_failures_stay_isolated_across_appends() {
    // finalize rejects everything, so driven files end FailedOther
    let backend = ScriptedBackend::new()
        .script("/api/upload", 200, TICKET)
        .script("storage.test/put", 200, "")
        .script("/api/finish", 500, "metadata update failed");
    let api = client(backend, AccessToken::new("up-token"));

    let mut queue = UploadQueue::new();
    queue.add_files([LocalFile::new("first.stl", Bytes::from_static(b"a"))]);
    queue.drive(&api, "visitor@example.com").await;

    let first_status = queue.units()[0].status().clone();
    match &first_status {
        UploadStatus::FailedOther(detail) => assert!(detail.contains("metadata update failed")),
        other => panic!("unexpected status: {other:?}"),
    }

    queue.add_files([LocalFile::new("second.stl", Bytes::from_static(b"b"))]);
    assert_eq!(queue.len(), 2);
    queue.drive(&api, "visitor@example.com").await;

    // the first unit kept its original terminal status
    assert_eq!(queue.units()[0].status(), &first_status);
    assert!(matches!(
        queue.units()[1].status(),
        UploadStatus::FailedOther(_)
    ));
}
