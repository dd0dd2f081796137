use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    app_constants::{
        EVENT_CHECKING, EVENT_DOWNLOAD_PROGRESS, EVENT_GLOBAL_SHORTCUT, EVENT_UPDATE_AVAILABLE,
        EVENT_UPDATE_DOWNLOADED, EVENT_UPDATE_ERROR, EVENT_UPDATE_NOT_AVAILABLE,
    },
    artifact_download::DownloadProgress,
    release_feed::VersionInfo,
    ShellError,
};

/// Connection to the UI process. The window may not exist yet, or may have
/// been destroyed, at the time a notification is produced.
pub trait UiChannel: Send + Sync {
    fn is_attached(&self) -> bool;
    fn deliver(&self, event: &str, payload: Value) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateErrorPayload {
    pub message: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&ShellError> for UpdateErrorPayload {
    fn from(error: &ShellError) -> Self {
        Self {
            message: error.to_string(),
            kind: error.kind(),
            status: error.status_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Checking,
    UpdateAvailable(VersionInfo),
    UpdateNotAvailable(VersionInfo),
    DownloadProgress(DownloadProgress),
    UpdateDownloaded { version: String, file_path: PathBuf },
    UpdateError(UpdateErrorPayload),
    GlobalShortcut { key: String, action: String },
}

impl ShellEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Checking => EVENT_CHECKING,
            Self::UpdateAvailable(_) => EVENT_UPDATE_AVAILABLE,
            Self::UpdateNotAvailable(_) => EVENT_UPDATE_NOT_AVAILABLE,
            Self::DownloadProgress(_) => EVENT_DOWNLOAD_PROGRESS,
            Self::UpdateDownloaded { .. } => EVENT_UPDATE_DOWNLOADED,
            Self::UpdateError(_) => EVENT_UPDATE_ERROR,
            Self::GlobalShortcut { .. } => EVENT_GLOBAL_SHORTCUT,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::Checking => Value::Null,
            Self::UpdateAvailable(info) | Self::UpdateNotAvailable(info) => json!(info),
            Self::DownloadProgress(progress) => json!(progress),
            Self::UpdateDownloaded { version, file_path } => json!({
                "version": version,
                "filePath": file_path.display().to_string(),
            }),
            Self::UpdateError(error) => json!(error),
            Self::GlobalShortcut { key, action } => json!({ "key": key, "action": action }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    DroppedNoListener,
    Failed,
}

/// Pushes notifications to the UI. Events produced while no UI is attached
/// are dropped and counted, never queued for a later subscriber.
pub struct EventRelay {
    channel: Arc<dyn UiChannel>,
    dropped: AtomicU64,
}

impl EventRelay {
    pub fn new(channel: Arc<dyn UiChannel>) -> Self {
        Self {
            channel,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn emit(&self, event: &ShellEvent) -> Delivery {
        if !self.channel.is_attached() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            if !matches!(event, ShellEvent::DownloadProgress(_)) {
                crate::append_desktop_log(&format!(
                    "dropping '{}' notification: no UI window attached",
                    event.name()
                ));
            }
            return Delivery::DroppedNoListener;
        }

        match self.channel.deliver(event.name(), event.payload()) {
            Ok(()) => Delivery::Delivered,
            Err(error) => {
                crate::append_desktop_log(&format!(
                    "failed to deliver '{}' notification: {error}",
                    event.name()
                ));
                Delivery::Failed
            }
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use serde_json::Value;

    use super::UiChannel;

    #[derive(Default)]
    pub(crate) struct RecordingChannel {
        detached: AtomicBool,
        pub(crate) events: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingChannel {
        pub(crate) fn detach(&self) {
            self.detached.store(true, Ordering::SeqCst);
        }

        pub(crate) fn attach(&self) {
            self.detached.store(false, Ordering::SeqCst);
        }

        pub(crate) fn names(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }

        pub(crate) fn payloads_of(&self, name: &str) -> Vec<Value> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(event, _)| event == name)
                .map(|(_, payload)| payload.clone())
                .collect()
        }
    }

    impl UiChannel for RecordingChannel {
        fn is_attached(&self) -> bool {
            !self.detached.load(Ordering::SeqCst)
        }

        fn deliver(&self, event: &str, payload: Value) -> Result<(), String> {
            self.events
                .lock()
                .unwrap()
                .push((event.to_string(), payload));
            Ok(())
        }
    }
}
