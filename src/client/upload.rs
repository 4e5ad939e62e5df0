//! File upload with progress
//!
//! The file travels as one JSON document `{ "filename", "filedata" }` where
//! `filedata` is a base64 data URL. The body is streamed in chunks so that
//! progress can be reported as a percentage of bytes handed to the
//! transport. Each upload runs as its own task; dropping interest in it is
//! done through [`UploadTask::cancel`].

use super::{ApiClient, ClientError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, RequestBuilder};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Upload endpoint
pub const UPLOAD_PATH: &str = "/upload-file";

/// A file read fully into memory, ready to be sent
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Metadata of a file accepted by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Serialize)]
struct UploadBody<'a> {
    filename: &'a str,
    filedata: String,
}

/// Encode `data` as a base64 data URL
pub fn data_url(content_type: &str, data: &[u8]) -> String {
    let mime = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Percentage of `sent` over `total`, clamped to 0..=100
fn percent(sent: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((sent as f64 / total as f64) * 100.0).min(100.0)
}

/// Shared handle on the single progress sender
///
/// The body stream may outlive the upload task inside the transport, so the
/// sender sits behind a slot that the task empties when it ends. Receivers
/// then see the stream close as soon as the task is done or aborted.
#[derive(Clone)]
struct ProgressSink(Arc<Mutex<Option<mpsc::UnboundedSender<f64>>>>);

impl ProgressSink {
    fn new(tx: mpsc::UnboundedSender<f64>) -> Self {
        Self(Arc::new(Mutex::new(Some(tx))))
    }

    fn report(&self, value: f64) {
        if let Ok(slot) = self.0.lock() {
            if let Some(tx) = slot.as_ref() {
                let _ = tx.send(value);
            }
        }
    }

    fn close(&self) {
        if let Ok(mut slot) = self.0.lock() {
            slot.take();
        }
    }
}

struct CloseOnDrop(ProgressSink);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// A running upload
///
/// Progress values arrive in non-decreasing order on [`UploadTask::progress`].
/// A successful upload always ends with `100.0`.
#[derive(Debug)]
pub struct UploadTask {
    file_name: String,
    progress: mpsc::UnboundedReceiver<f64>,
    handle: JoinHandle<Result<UploadedFile, ClientError>>,
}

impl UploadTask {
    /// Name of the file being uploaded
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Receiver of progress percentages
    pub fn progress(&mut self) -> &mut mpsc::UnboundedReceiver<f64> {
        &mut self.progress
    }

    /// Next progress value, `None` once the upload has ended
    pub async fn next_progress(&mut self) -> Option<f64> {
        self.progress.recv().await
    }

    /// Abort the upload
    pub fn cancel(&self) {
        tracing::info!(file = %self.file_name, "Upload cancelled");
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the terminal result
    pub async fn wait(self) -> Result<UploadedFile, ClientError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClientError::Aborted("cancelled".to_string())),
            Err(e) => Err(ClientError::Aborted(e.to_string())),
        }
    }
}

impl ApiClient {
    /// The upload POST, timed by `upload_timeout_secs` instead of the
    /// client-wide request timeout
    fn upload_request(&self, body: Body) -> RequestBuilder {
        let builder = self
            .http()
            .post(self.url(UPLOAD_PATH))
            .header(CONTENT_TYPE, "application/json")
            .timeout(Duration::from_secs(self.config().upload_timeout_secs))
            .body(body);
        self.authorize(builder, UPLOAD_PATH)
    }

    /// Start uploading a file in a background task
    pub fn upload(&self, request: UploadRequest) -> UploadTask {
        let (tx, rx) = mpsc::unbounded_channel();
        let file_name = request.file_name.clone();
        let client = self.clone();

        let handle = tokio::spawn(async move {
            let sink = ProgressSink::new(tx);
            let _close = CloseOnDrop(sink.clone());
            let result = client.send_upload(request, &sink).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Upload failed");
            }
            result
        });

        UploadTask {
            file_name,
            progress: rx,
            handle,
        }
    }

    async fn send_upload(
        &self,
        request: UploadRequest,
        progress: &ProgressSink,
    ) -> Result<UploadedFile, ClientError> {
        let body = serde_json::to_vec(&UploadBody {
            filename: &request.file_name,
            filedata: data_url(&request.content_type, &request.data),
        })?;

        let total = body.len();
        let chunk_size = self.config().upload_chunk_size.max(1);
        let chunks: Vec<Vec<u8>> = body.chunks(chunk_size).map(<[u8]>::to_vec).collect();

        tracing::info!(
            file = %request.file_name,
            bytes = request.data.len(),
            body_bytes = total,
            chunks = chunks.len(),
            "Starting upload"
        );

        let chunk_progress = progress.clone();
        let mut sent = 0usize;
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len();
            chunk_progress.report(percent(sent, total));
            Ok::<_, std::io::Error>(chunk)
        }));

        let response = self.upload_request(Body::wrap_stream(stream)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        progress.report(100.0);
        tracing::info!(file = %request.file_name, "Upload complete");

        Ok(UploadedFile {
            file_name: request.file_name,
            content_type: request.content_type,
            size: request.data.len(),
        })
    }
}
