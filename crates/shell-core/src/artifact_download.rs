use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use serde::Serialize;
use tokio::{fs, io::AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{append_update_log, ShellError, ShellResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadState {
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTask {
    pub source_url: String,
    pub destination_path: PathBuf,
    pub total_bytes: Option<u64>,
    pub transferred_bytes: u64,
    pub state: DownloadState,
}

impl DownloadTask {
    fn new(source_url: &str, destination_path: &Path) -> Self {
        Self {
            source_url: source_url.to_string(),
            destination_path: destination_path.to_path_buf(),
            total_bytes: None,
            transferred_bytes: 0,
            state: DownloadState::Pending,
        }
    }

    /// `None` while the total size is unknown; callers must then treat the
    /// report as a plain byte count.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_bytes.filter(|total| *total > 0)?;
        Some((self.transferred_bytes.saturating_mul(100) / total).min(100) as u8)
    }

    fn progress(&self) -> DownloadProgress {
        DownloadProgress {
            percent: self.percent(),
            transferred: self.transferred_bytes,
            total: self.total_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub percent: Option<u8>,
    pub transferred: u64,
    pub total: Option<u64>,
}

pub struct ArtifactResponse {
    pub status: u16,
    pub reason: String,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, ShellResult<Vec<u8>>>,
}

/// Opens a streaming GET for an artifact URL.
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    async fn open(&self, url: &Url) -> ShellResult<ArtifactResponse>;
}

pub struct HttpsTransport {
    client: reqwest::Client,
}

impl HttpsTransport {
    pub fn new(user_agent: &str) -> ShellResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .https_only(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactTransport for HttpsTransport {
    async fn open(&self, url: &Url) -> ShellResult<ArtifactResponse> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ShellError::from))
            .boxed();

        Ok(ArtifactResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            content_length,
            body,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub cancel: CancellationToken,
    /// Upper bound on the wait for the response and for each chunk.
    pub stall_timeout: Option<Duration>,
}

pub fn parse_secure_url(raw_url: &str) -> ShellResult<Url> {
    let trimmed = raw_url.trim();
    let parsed = Url::parse(trimmed).map_err(|_| ShellError::InsecureUrl(trimmed.to_string()))?;
    match parsed.scheme() {
        "https" => Ok(parsed),
        _ => Err(ShellError::InsecureUrl(trimmed.to_string())),
    }
}

#[derive(Clone)]
pub struct SecureDownloader {
    transport: Arc<dyn ArtifactTransport>,
}

impl SecureDownloader {
    pub fn new(transport: Arc<dyn ArtifactTransport>) -> Self {
        Self { transport }
    }

    /// Streams `url` into `<destination>.part` and moves it over
    /// `destination` once complete. On failure only the `.part` file is
    /// removed; an earlier artifact at `destination` stays untouched.
    pub async fn download<F>(
        &self,
        url: &str,
        destination: &Path,
        mut on_progress: F,
        options: &DownloadOptions,
    ) -> ShellResult<DownloadTask>
    where
        F: FnMut(DownloadProgress) + Send,
    {
        let parsed = parse_secure_url(url)?;
        let mut task = DownloadTask::new(parsed.as_str(), destination);
        let partial = partial_path(destination);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await.map_err(|error| {
                ShellError::Filesystem(format!(
                    "Failed to create download directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        task.state = DownloadState::InProgress;
        match self
            .stream_to_file(&parsed, &partial, &mut task, &mut on_progress, options)
            .await
        {
            Ok(()) => {
                task.state = DownloadState::Completed;
                append_update_log(&format!(
                    "downloaded {} bytes to {}",
                    task.transferred_bytes,
                    destination.display()
                ));
                Ok(task)
            }
            Err(error) => {
                task.state = DownloadState::Failed;
                append_update_log(&format!("download of {} failed: {error}", parsed));
                remove_partial_file(&partial).await;
                Err(error)
            }
        }
    }

    async fn stream_to_file<F>(
        &self,
        url: &Url,
        partial: &Path,
        task: &mut DownloadTask,
        on_progress: &mut F,
        options: &DownloadOptions,
    ) -> ShellResult<()>
    where
        F: FnMut(DownloadProgress) + Send,
    {
        let response = guarded(options, self.transport.open(url)).await??;
        if !(200..300).contains(&response.status) {
            return Err(ShellError::HttpStatus {
                status: response.status,
                reason: response.reason,
            });
        }

        task.total_bytes = response.content_length.filter(|total| *total > 0);
        let mut body = response.body;
        let mut file = fs::File::create(partial).await?;

        while let Some(chunk) = guarded(options, body.next()).await? {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            task.transferred_bytes += chunk.len() as u64;
            on_progress(task.progress());
        }

        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Some(total) = task.total_bytes {
            if task.transferred_bytes != total {
                return Err(ShellError::Network(format!(
                    "Connection closed after {} of {} bytes",
                    task.transferred_bytes, total
                )));
            }
        }

        fs::rename(partial, &task.destination_path)
            .await
            .map_err(|error| {
                ShellError::Filesystem(format!(
                    "Failed to move {} into place: {error}",
                    partial.display()
                ))
            })
    }
}

/// Races `future` against cancellation and the stall timeout.
async fn guarded<T>(options: &DownloadOptions, future: impl Future<Output = T>) -> ShellResult<T> {
    let bounded = async {
        match options.stall_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| ShellError::Timeout(limit)),
            None => Ok(future.await),
        }
    };

    tokio::select! {
        biased;
        _ = options.cancel.cancelled() => Err(ShellError::Cancelled),
        result = bounded => result,
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

async fn remove_partial_file(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => append_update_log(&format!("removed partial download {}", path.display())),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => append_update_log(&format!(
            "failed to remove partial download {}: {error}",
            path.display()
        )),
    }
}
