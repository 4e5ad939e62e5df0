//! File-storage browser
//!
//! The entry list comes from the server on load. Afterwards it is kept up
//! to date locally: a finished upload appends an entry (without a remote
//! file id, the upload endpoint does not return one) and a successful
//! delete removes it. [`FileBrowser::refresh`] reconciles with the server.

use super::{ViewError, ViewResult};
use crate::client::{ApiClient, ClientError, UploadRequest, UploadTask, UploadedFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILES_PATH: &str = "/files";

/// Metadata of one stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(alias = "_id")]
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub file_id: Option<String>,
}

impl FileEntry {
    pub fn kind(&self) -> FileKind {
        FileKind::from_content_type(&self.content_type)
    }
}

/// Coarse file classification used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Pdf,
    Document,
    Other,
}

impl FileKind {
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            FileKind::Image
        } else if content_type.starts_with("video/") {
            FileKind::Video
        } else if content_type == "application/pdf" {
            FileKind::Pdf
        } else if content_type.starts_with("text/")
            || content_type.contains("document")
            || content_type == "application/msword"
        {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Pdf => "pdf",
            FileKind::Document => "document",
            FileKind::Other => "file",
        }
    }
}

/// Content type guessed from a file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "",
    }
}

/// The file-storage screen
#[derive(Debug)]
pub struct FileBrowser {
    client: ApiClient,
    files: Vec<FileEntry>,
    uploading: bool,
    upload_progress: f64,
}

impl FileBrowser {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            files: Vec::new(),
            uploading: false,
            upload_progress: 0.0,
        }
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Last progress value seen, 0 to 100
    pub fn upload_progress(&self) -> f64 {
        self.upload_progress
    }

    /// Replace the list with the server's
    pub async fn refresh(&mut self) -> ViewResult<&[FileEntry]> {
        match self.client.get::<Vec<FileEntry>>(FILES_PATH).await {
            Ok(files) => {
                self.files = files;
                Ok(&self.files)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching files");
                Err(e.into())
            }
        }
    }

    /// Read a local file and start uploading it
    pub async fn upload_path(&mut self, path: &Path) -> ViewResult<UploadTask> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ViewError::NotFound(format!("{:?} has no file name", path)))?;

        Ok(self.upload(UploadRequest {
            file_name,
            content_type: content_type_for(path).to_string(),
            data,
        }))
    }

    /// Start uploading in-memory content
    pub fn upload(&mut self, request: UploadRequest) -> UploadTask {
        self.uploading = true;
        self.upload_progress = 0.0;
        self.client.upload(request)
    }

    /// Record a progress value reported by a running upload
    pub fn record_progress(&mut self, progress: f64) {
        self.upload_progress = progress;
    }

    /// Drive `task` to completion, tracking its progress
    ///
    /// On success one entry is appended to the list. On failure the error is
    /// logged and progress goes back to zero.
    pub async fn finish_upload(&mut self, mut task: UploadTask) -> ViewResult<FileEntry> {
        while let Some(progress) = task.next_progress().await {
            self.record_progress(progress);
        }
        let result = task.wait().await;
        self.complete(result)
    }

    fn complete(&mut self, result: Result<UploadedFile, ClientError>) -> ViewResult<FileEntry> {
        self.uploading = false;
        match result {
            Ok(uploaded) => {
                self.upload_progress = 100.0;
                let entry = FileEntry {
                    id: chrono::Utc::now().timestamp_millis().to_string(),
                    file_name: uploaded.file_name,
                    content_type: uploaded.content_type,
                    file_id: None,
                };
                self.files.push(entry.clone());
                Ok(entry)
            }
            Err(e) => {
                tracing::error!(error = %e, "Upload failed");
                self.upload_progress = 0.0;
                Err(e.into())
            }
        }
    }

    /// Abort a running upload and reset progress
    pub fn cancel_upload(&mut self, task: &UploadTask) {
        task.cancel();
        self.uploading = false;
        self.upload_progress = 0.0;
    }

    fn find(&self, id: &str) -> ViewResult<&FileEntry> {
        self.files.iter().find(|f| f.id == id).ok_or_else(|| {
            tracing::error!(id, "File not found");
            ViewError::NotFound(format!("file {}", id))
        })
    }

    fn remote_id(entry: &FileEntry) -> ViewResult<&str> {
        entry.file_id.as_deref().ok_or_else(|| {
            ViewError::NotFound(format!(
                "{} has no remote file id yet; refresh the list",
                entry.file_name
            ))
        })
    }

    /// Download an entry's content
    pub async fn download(&self, id: &str) -> ViewResult<Vec<u8>> {
        let entry = self.find(id)?;
        let file_id = Self::remote_id(entry)?;
        let path = format!("/get-file/{}", urlencoding::encode(file_id));

        self.client.get_bytes(&path).await.map_err(|e| {
            tracing::error!(error = %e, "Download failed");
            e.into()
        })
    }

    /// Download an entry into `dir` under its own file name
    pub async fn download_to(&self, id: &str, dir: &Path) -> ViewResult<PathBuf> {
        let data = self.download(id).await?;
        let entry = self.find(id)?;
        let name = Path::new(&entry.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| entry.id.clone().into());
        let target = dir.join(name);
        tokio::fs::write(&target, data).await?;
        Ok(target)
    }

    /// Delete an entry on the server, then drop it from the list
    pub async fn delete(&mut self, id: &str) -> ViewResult<()> {
        let entry = self.find(id)?;
        let file_id = Self::remote_id(entry)?;
        let path = format!("/file/{}", urlencoding::encode(file_id));

        if let Err(e) = self.client.delete::<serde_json::Value>(&path).await {
            tracing::error!(error = %e, "Error deleting file");
            return Err(e.into());
        }

        tracing::info!(id, "File deleted successfully");
        self.files.retain(|f| f.id != id);
        Ok(())
    }
}
