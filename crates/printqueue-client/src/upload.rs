//! Multi-file upload orchestration.
//!
//! Each dropped file becomes an [`UploadUnit`] that runs the three-step
//! remote protocol (presign, transfer, finalize) on its own, independent of
//! every other unit. Units transition exactly once from `Pending` to a
//! terminal status and are never retried; retrying means re-adding the file,
//! which creates a new unit.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use futures::future::join_all;
use printqueue_core::constants::MAX_UPLOAD_BYTES;
use printqueue_core::UploadFailure;

use crate::api::ApiClient;
use crate::transport::Transport;

/// A local file picked for upload: a name, a declared byte size, and the
/// content. The content is a cheaply-cloneable handle, not a copy.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub size: u64,
    pub content: Bytes,
}

impl LocalFile {
    /// An in-memory file; the size is the content length.
    pub fn new(name: impl Into<String>, content: Bytes) -> Self {
        let size = content.len() as u64;
        LocalFile {
            name: name.into(),
            size,
            content,
        }
    }

    /// Load a file from disk, named after its final path component.
    ///
    /// The size comes from file metadata. Oversized files are never
    /// transferred, so their content is not read at all.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        let content = if size > MAX_UPLOAD_BYTES {
            Bytes::new()
        } else {
            Bytes::from(std::fs::read(path)?)
        };

        Ok(LocalFile {
            name,
            size,
            content,
        })
    }
}

/// Status of one upload unit. `Pending` transitions exactly once to one of
/// the three terminal variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Succeeded,
    /// Rejected by the client-side size guard; no network call was made.
    FailedTooBig,
    /// Any other failure, with the captured detail for display.
    FailedOther(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadStatus::Pending)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Succeeded => write!(f, "succeeded"),
            UploadStatus::FailedTooBig => write!(f, "failed: file exceeded 50MB limit"),
            UploadStatus::FailedOther(detail) => write!(f, "failed: {detail}"),
        }
    }
}

/// One file's journey through the upload protocol.
#[derive(Debug)]
pub struct UploadUnit {
    file: LocalFile,
    status: UploadStatus,
}

impl UploadUnit {
    fn new(file: LocalFile) -> Self {
        UploadUnit {
            file,
            status: UploadStatus::Pending,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }
}

/// Drive one file through the upload protocol:
/// size guard, then presign, transfer, finalize in strict sequence.
///
/// The guard short-circuits before any network call. Every other failure is
/// returned as the step's named variant; nothing is retried here.
pub async fn upload_one<T: Transport>(
    api: &ApiClient<T>,
    file: &LocalFile,
    email: &str,
) -> Result<(), UploadFailure> {
    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadFailure::TooBig);
    }

    let ticket = api.request_upload(&file.name, email).await?;
    api.transfer(&ticket, file.content.clone()).await?;
    api.finish_upload(&ticket.id, email).await?;

    tracing::info!(name = %file.name, size = file.size, "upload finished");
    Ok(())
}

/// Append-only arena of upload units.
///
/// Files may be added incrementally across several pick events; existing
/// units are never removed or replaced. `drive` runs every pending unit
/// concurrently; each unit's status is written only by its own future, so
/// one file's failure cannot touch another's.
#[derive(Debug, Default)]
pub struct UploadQueue {
    units: Vec<UploadUnit>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of files as pending units.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = LocalFile>) {
        for file in files {
            self.units.push(UploadUnit::new(file));
        }
    }

    pub fn units(&self) -> &[UploadUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Run every pending unit to a terminal status.
    ///
    /// Units run concurrently with no ordering guarantee and no concurrency
    /// bound. Units already terminal (earlier batches) are left untouched.
    pub async fn drive<T: Transport>(&mut self, api: &ApiClient<T>, email: &str) {
        let work = self
            .units
            .iter_mut()
            .filter(|unit| !unit.status.is_terminal())
            .map(|unit| async move {
                let status = match upload_one(api, &unit.file, email).await {
                    Ok(()) => UploadStatus::Succeeded,
                    Err(UploadFailure::TooBig) => UploadStatus::FailedTooBig,
                    Err(err) => {
                        tracing::warn!(name = %unit.file.name, error = %err, "upload failed");
                        UploadStatus::FailedOther(err.to_string())
                    }
                };
                unit.status = status;
            });

        join_all(work).await;
    }
}
