//! Shared constants.

/// Hard upload size limit in bytes (50 MiB).
///
/// Matches the `X-Goog-Content-Length-Range` constraint the backend puts on
/// presigned destinations. Files above this limit are rejected client-side
/// before any network call, since starting the transfer would only waste
/// bandwidth on a doomed request.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Default API base URL when `PRINTQUEUE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Path that selects the lab (download) view. Every other path selects the
/// upload view.
pub const LAB_PATH: &str = "/lab";
