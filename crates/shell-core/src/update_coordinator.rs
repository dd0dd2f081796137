use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    append_update_log,
    artifact_download::{DownloadOptions, SecureDownloader},
    artifact_paths,
    release_feed::{ReleaseSource, VersionInfo},
    update_config::UpdaterConfig,
    update_events::{EventRelay, ShellEvent, UpdateErrorPayload},
    update_session::{UpdateSession, UpdateSessionSnapshot},
    AtomicFlagGuard, ShellError, ShellResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallChoice {
    InstallNow,
    InstallLater,
}

/// Blocking "Install Now" / "Install Later" confirmation shown once an
/// artifact is on disk.
#[async_trait]
pub trait InstallPrompt: Send + Sync {
    async fn ask(&self, version: &str) -> InstallChoice;
}

/// Process-level facilities of the host.
pub trait ProcessControl: Send + Sync {
    /// Hands the installer to the OS default handler for its file type.
    fn open_artifact(&self, path: &Path) -> ShellResult<()>;
    fn exit(&self);
    fn relaunch(&self);
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUpdateOptions {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckOutcome {
    pub available: bool,
    pub current_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    pub version: String,
    pub file_path: PathBuf,
    pub install: InstallChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupCheck {
    SkippedDevelopmentMode,
    AlreadyRan,
    SkippedBusy,
    Checked(UpdateCheckOutcome),
    Failed(String),
}

fn validate_download_request(
    options: &DownloadUpdateOptions,
    pending: &VersionInfo,
) -> ShellResult<()> {
    if let Some(url) = options.url.as_deref().map(str::trim) {
        if url != pending.artifact_url {
            return Err(ShellError::InvalidRequest(format!(
                "Download URL '{url}' does not match the published artifact for {}",
                pending.version
            )));
        }
    }
    if let Some(version) = options.version.as_deref().map(str::trim) {
        if version != pending.version {
            return Err(ShellError::InvalidRequest(format!(
                "Requested version {version} but the available update is {}",
                pending.version
            )));
        }
    }
    Ok(())
}

pub struct UpdateCoordinator {
    config: UpdaterConfig,
    releases: Arc<dyn ReleaseSource>,
    downloader: SecureDownloader,
    prompt: Arc<dyn InstallPrompt>,
    process: Arc<dyn ProcessControl>,
    events: Arc<EventRelay>,
    session: Mutex<UpdateSession>,
    in_flight: AtomicBool,
    startup_check_started: AtomicBool,
    active_download: Mutex<Option<CancellationToken>>,
}

impl UpdateCoordinator {
    pub fn new(
        config: UpdaterConfig,
        releases: Arc<dyn ReleaseSource>,
        downloader: SecureDownloader,
        prompt: Arc<dyn InstallPrompt>,
        process: Arc<dyn ProcessControl>,
        events: Arc<EventRelay>,
    ) -> Self {
        Self {
            config,
            releases,
            downloader,
            prompt,
            process,
            events,
            session: Mutex::new(UpdateSession::default()),
            in_flight: AtomicBool::new(false),
            startup_check_started: AtomicBool::new(false),
            active_download: Mutex::new(None),
        }
    }

    pub fn current_version(&self) -> &str {
        &self.config.current_version
    }

    fn session(&self) -> MutexGuard<'_, UpdateSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> UpdateSessionSnapshot {
        self.session().snapshot()
    }

    fn report_failure(&self, error: &ShellError) {
        self.session().fail(error);
        self.events
            .emit(&ShellEvent::UpdateError(UpdateErrorPayload::from(error)));
    }

    pub async fn check_for_updates(&self) -> ShellResult<UpdateCheckOutcome> {
        let _in_flight = AtomicFlagGuard::try_set(&self.in_flight).ok_or(ShellError::SessionBusy)?;
        self.run_check(true).await
    }

    async fn run_check(&self, surface_failure: bool) -> ShellResult<UpdateCheckOutcome> {
        self.session().begin_check()?;
        self.events.emit(&ShellEvent::Checking);
        append_update_log(&format!(
            "checking for updates, current_version={}",
            self.config.current_version
        ));

        let info = match self.releases.latest_release().await {
            Ok(info) => info,
            Err(error) => {
                append_update_log(&format!("update check failed: {error}"));
                if surface_failure {
                    self.report_failure(&error);
                } else if let Err(phase_error) = self.session().abandon_check() {
                    append_update_log(&format!("failed to abandon update check: {phase_error}"));
                }
                return Err(error);
            }
        };

        let available = self
            .session()
            .finish_check(info.clone(), &self.config.current_version)?;
        append_update_log(&format!(
            "update check finished: has_update={available} latest_version={}",
            info.version
        ));

        let outcome = UpdateCheckOutcome {
            available,
            current_version: self.config.current_version.clone(),
            version: Some(info.version.clone()),
            release_notes: Some(info.release_notes.clone()),
        };
        if available {
            self.events.emit(&ShellEvent::UpdateAvailable(info));
        } else {
            self.events.emit(&ShellEvent::UpdateNotAvailable(info));
        }
        Ok(outcome)
    }

    pub async fn download_update(
        &self,
        options: DownloadUpdateOptions,
    ) -> ShellResult<DownloadOutcome> {
        let _in_flight = AtomicFlagGuard::try_set(&self.in_flight).ok_or(ShellError::SessionBusy)?;

        let info = {
            let mut session = self.session();
            if let Some(pending) = session.pending_version_info() {
                validate_download_request(&options, pending)?;
            }
            session.begin_download()?
        };

        let destination = artifact_paths::artifact_path(&self.config.downloads_dir, &info.version);
        let download_options = DownloadOptions {
            cancel: CancellationToken::new(),
            stall_timeout: self.config.download_stall_timeout,
        };
        *self
            .active_download
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(download_options.cancel.clone());
        append_update_log(&format!(
            "downloading update {} from {}",
            info.version, info.artifact_url
        ));

        let events = &self.events;
        let result = self
            .downloader
            .download(
                &info.artifact_url,
                &destination,
                |progress| {
                    events.emit(&ShellEvent::DownloadProgress(progress));
                },
                &download_options,
            )
            .await;
        self.active_download
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let task = match result {
            Ok(task) => task,
            Err(error) => {
                self.report_failure(&error);
                return Err(error);
            }
        };

        self.session()
            .finish_download(task.destination_path.clone())?;
        self.events.emit(&ShellEvent::UpdateDownloaded {
            version: info.version.clone(),
            file_path: task.destination_path.clone(),
        });

        let install = self.prompt.ask(&info.version).await;
        append_update_log(&format!("install prompt for {}: {install:?}", info.version));

        match install {
            InstallChoice::InstallNow => {
                let path = self.session().confirm_install()?;
                if let Err(error) = self.process.open_artifact(&path) {
                    self.report_failure(&error);
                    return Err(error);
                }
                append_update_log(&format!(
                    "launched installer {}, exiting host",
                    path.display()
                ));
                self.process.exit();
            }
            InstallChoice::InstallLater => {
                self.session().defer_install()?;
            }
        }

        Ok(DownloadOutcome {
            version: info.version,
            file_path: task.destination_path,
            install,
        })
    }

    /// Returns whether a download was running.
    pub fn cancel_download(&self) -> bool {
        match self
            .active_download
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(token) => {
                token.cancel();
                append_update_log("download cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Relaunches regardless of the session phase.
    pub fn restart_app(&self) {
        append_update_log(&format!(
            "restart requested in phase {}",
            self.session().phase()
        ));
        self.process.relaunch();
    }

    /// The one automatic check per process, run after the configured delay.
    pub async fn run_startup_check(&self) -> StartupCheck {
        if self.config.development_mode {
            append_update_log("development mode, skipping startup update check");
            return StartupCheck::SkippedDevelopmentMode;
        }
        if self.startup_check_started.swap(true, Ordering::AcqRel) {
            return StartupCheck::AlreadyRan;
        }

        tokio::time::sleep(self.config.auto_check_delay).await;

        let Some(_in_flight) = AtomicFlagGuard::try_set(&self.in_flight) else {
            append_update_log("startup update check skipped: another update operation is running");
            return StartupCheck::SkippedBusy;
        };

        match self
            .run_check(self.config.notify_on_auto_check_failure)
            .await
        {
            Ok(outcome) => StartupCheck::Checked(outcome),
            Err(error) => {
                append_update_log(&format!("startup update check failed (silent): {error}"));
                StartupCheck::Failed(error.to_string())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::{
        sync::{Mutex, OnceLock, Weak},
        time::Duration,
    };

    use serde_json::json;
    use tokio::sync::Notify;

    use super::testing::{version_info, FixedPrompt, RecordingProcess, StaticReleases};
    use super::*;
    use crate::{
        app_constants::{EVENT_DOWNLOAD_PROGRESS, EVENT_UPDATE_ERROR},
        artifact_download::testing::CannedTransport,
        update_events::testing::RecordingChannel,
        update_session::UpdatePhase,
    };

    struct Harness {
        coordinator: Arc<UpdateCoordinator>,
        releases: Arc<StaticReleases>,
        channel: Arc<RecordingChannel>,
        process: Arc<RecordingProcess>,
        _downloads: tempfile::TempDir,
    }

    fn harness_with(
        releases: StaticReleases,
        transport: CannedTransport,
        prompt: Arc<dyn InstallPrompt>,
        configure: impl FnOnce(&mut UpdaterConfig),
    ) -> Harness {
        let downloads = tempfile::tempdir().unwrap();
        let mut config = UpdaterConfig::new("1.1.0", false);
        config.downloads_dir = downloads.path().to_path_buf();
        config.auto_check_delay = Duration::ZERO;
        configure(&mut config);

        let releases = Arc::new(releases);
        let channel = Arc::new(RecordingChannel::default());
        let process = Arc::new(RecordingProcess::default());
        let coordinator = Arc::new(UpdateCoordinator::new(
            config,
            releases.clone(),
            SecureDownloader::new(Arc::new(transport)),
            prompt,
            process.clone(),
            Arc::new(EventRelay::new(channel.clone())),
        ));
        Harness {
            coordinator,
            releases,
            channel,
            process,
            _downloads: downloads,
        }
    }

    fn harness(releases: StaticReleases, transport: CannedTransport, choice: InstallChoice) -> Harness {
        harness_with(releases, transport, Arc::new(FixedPrompt(choice)), |_| {})
    }

    /// Records the session phase at the moment the install prompt opens.
    struct PhaseRecordingPrompt {
        coordinator: OnceLock<Weak<UpdateCoordinator>>,
        seen: Mutex<Option<UpdatePhase>>,
    }

    #[async_trait]
    impl InstallPrompt for PhaseRecordingPrompt {
        async fn ask(&self, _version: &str) -> InstallChoice {
            let phase = self
                .coordinator
                .get()
                .and_then(Weak::upgrade)
                .map(|coordinator| coordinator.snapshot().phase);
            *self.seen.lock().unwrap() = phase;
            InstallChoice::InstallLater
        }
    }

    #[tokio::test]
    async fn newer_release_downloads_in_quarters_and_reaches_downloaded() {
        let recorder = Arc::new(PhaseRecordingPrompt {
            coordinator: OnceLock::new(),
            seen: Mutex::new(None),
        });
        let h = harness_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(1000, 250),
            recorder.clone(),
            |_| {},
        );
        recorder
            .coordinator
            .set(Arc::downgrade(&h.coordinator))
            .ok()
            .unwrap();

        let outcome = h.coordinator.check_for_updates().await.unwrap();
        assert!(outcome.available);
        assert_eq!(outcome.version.as_deref(), Some("1.2.0"));
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Available);

        let downloaded = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap();

        let percents: Vec<_> = h
            .channel
            .payloads_of(EVENT_DOWNLOAD_PROGRESS)
            .into_iter()
            .map(|payload| payload["percent"].clone())
            .collect();
        assert_eq!(percents, vec![json!(25), json!(50), json!(75), json!(100)]);
        assert_eq!(*recorder.seen.lock().unwrap(), Some(UpdatePhase::Downloaded));
        assert_eq!(std::fs::metadata(&downloaded.file_path).unwrap().len(), 1000);
        assert_eq!(downloaded.install, InstallChoice::InstallLater);

        let snapshot = h.coordinator.snapshot();
        assert_eq!(snapshot.phase, UpdatePhase::Idle);
        assert_eq!(snapshot.downloaded_file_path, Some(downloaded.file_path));
        assert!(h.process.opened.lock().unwrap().is_empty());
        assert_eq!(
            h.channel.names(),
            vec![
                "checking",
                "update-available",
                "download-progress",
                "download-progress",
                "download-progress",
                "download-progress",
                "update-downloaded",
            ]
        );
    }

    #[tokio::test]
    async fn install_now_opens_artifact_and_exits() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(100, 50),
            InstallChoice::InstallNow,
        );
        h.coordinator.check_for_updates().await.unwrap();

        let outcome = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Installing);
        assert_eq!(*h.process.opened.lock().unwrap(), vec![outcome.file_path]);
        assert_eq!(*h.process.exits.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn http_404_leaves_error_phase_and_no_file() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::status(404, "Not Found"),
            InstallChoice::InstallNow,
        );
        h.coordinator.check_for_updates().await.unwrap();

        let error = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), Some(404));
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Error);
        let expected = artifact_paths::artifact_path(
            &h.coordinator.config.downloads_dir,
            "1.2.0",
        );
        assert!(!expected.exists());
        assert_eq!(
            h.channel.payloads_of(EVENT_UPDATE_ERROR),
            vec![json!({ "message": "HTTP 404: Not Found", "kind": "HttpStatusError", "status": 404 })]
        );
    }

    #[tokio::test]
    async fn failed_redownload_keeps_artifact_from_install_later() {
        let mut transport = CannedTransport::ok_in_chunks(100, 50);
        transport.later_status = Some((404, "Not Found"));
        let h = harness(
            StaticReleases::ok("1.2.0"),
            transport,
            InstallChoice::InstallLater,
        );

        h.coordinator.check_for_updates().await.unwrap();
        let first = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap();
        assert!(first.file_path.exists());

        h.coordinator.check_for_updates().await.unwrap();
        let error = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), Some(404));
        let snapshot = h.coordinator.snapshot();
        assert_eq!(snapshot.phase, UpdatePhase::Error);
        assert_eq!(snapshot.downloaded_file_path.as_ref(), Some(&first.file_path));
        assert_eq!(std::fs::metadata(&first.file_path).unwrap().len(), 100);
    }

    #[tokio::test]
    async fn cancelling_running_download_fails_with_cancelled_and_frees_session() {
        let mut transport = CannedTransport::ok_in_chunks(1000, 250);
        transport.chunks.truncate(2);
        transport.hang_after_chunks = true;
        let h = harness(
            StaticReleases::ok("1.2.0"),
            transport,
            InstallChoice::InstallLater,
        );
        h.coordinator.check_for_updates().await.unwrap();

        let download = tokio::spawn({
            let coordinator = h.coordinator.clone();
            async move {
                coordinator
                    .download_update(DownloadUpdateOptions::default())
                    .await
            }
        });
        while h.channel.payloads_of(EVENT_DOWNLOAD_PROGRESS).len() < 2 {
            tokio::task::yield_now().await;
        }

        assert!(h.coordinator.cancel_download());
        let error = download.await.unwrap().unwrap_err();
        assert!(matches!(error, ShellError::Cancelled));

        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Error);
        assert_eq!(
            h.channel.payloads_of(EVENT_UPDATE_ERROR),
            vec![json!({ "message": "Download cancelled", "kind": "Cancelled" })]
        );
        let expected = artifact_paths::artifact_path(&h.coordinator.config.downloads_dir, "1.2.0");
        assert!(!expected.exists());
        assert!(!h.coordinator.cancel_download());

        assert!(h.coordinator.check_for_updates().await.unwrap().available);
    }

    #[tokio::test]
    async fn silent_startup_failure_keeps_update_found_by_manual_check() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(100, 50),
            InstallChoice::InstallLater,
        );
        assert!(h.coordinator.check_for_updates().await.unwrap().available);

        *h.releases.result.lock().unwrap() = Err("offline".to_string());
        assert!(matches!(
            h.coordinator.run_startup_check().await,
            StartupCheck::Failed(_)
        ));

        let snapshot = h.coordinator.snapshot();
        assert_eq!(snapshot.phase, UpdatePhase::Available);
        assert_eq!(
            snapshot.pending_version_info.map(|info| info.version),
            Some("1.2.0".to_string())
        );
        assert!(h.channel.payloads_of(EVENT_UPDATE_ERROR).is_empty());
        h.coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_version_is_not_available() {
        let h = harness(
            StaticReleases::ok("1.1.0"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );
        let outcome = h.coordinator.check_for_updates().await.unwrap();
        assert!(!outcome.available);
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::NotAvailable);
        assert_eq!(h.channel.names(), vec!["checking", "update-not-available"]);

        let error = h
            .coordinator
            .download_update(DownloadUpdateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ShellError::InvalidPhase { .. }));
    }

    #[tokio::test]
    async fn manual_check_failure_surfaces_error_phase_and_event() {
        let h = harness(
            StaticReleases::failing("dns lookup failed"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );
        let error = h.coordinator.check_for_updates().await.unwrap_err();
        assert_eq!(error.kind(), "NetworkError");
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Error);
        assert_eq!(h.channel.payloads_of(EVENT_UPDATE_ERROR).len(), 1);

        *h.releases.result.lock().unwrap() = Ok(version_info("1.2.0"));
        assert!(h.coordinator.check_for_updates().await.unwrap().available);
    }

    #[tokio::test]
    async fn concurrent_check_is_rejected_as_busy() {
        let gate = Arc::new(Notify::new());
        let mut releases = StaticReleases::ok("1.2.0");
        releases.gate = Some(gate.clone());
        let h = harness(
            releases,
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );

        let first = tokio::spawn({
            let coordinator = h.coordinator.clone();
            async move { coordinator.check_for_updates().await }
        });
        while h.coordinator.snapshot().phase != UpdatePhase::Checking {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            h.coordinator.check_for_updates().await,
            Err(ShellError::SessionBusy)
        ));
        assert!(matches!(
            h.coordinator
                .download_update(DownloadUpdateOptions::default())
                .await,
            Err(ShellError::SessionBusy)
        ));

        gate.notify_one();
        assert!(first.await.unwrap().unwrap().available);
    }

    #[tokio::test]
    async fn mismatched_download_request_is_rejected_without_leaving_available() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );
        h.coordinator.check_for_updates().await.unwrap();

        let error = h
            .coordinator
            .download_update(DownloadUpdateOptions {
                url: Some("https://evil.example/payload.exe".to_string()),
                version: Some("1.2.0".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(error, ShellError::InvalidRequest(_)));
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Available);
    }

    #[tokio::test]
    async fn startup_check_failure_is_silent_by_default() {
        let h = harness(
            StaticReleases::failing("offline"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );

        let result = h.coordinator.run_startup_check().await;
        assert!(matches!(result, StartupCheck::Failed(_)));
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Idle);
        assert!(h.channel.payloads_of(EVENT_UPDATE_ERROR).is_empty());

        assert_eq!(h.coordinator.run_startup_check().await, StartupCheck::AlreadyRan);
    }

    #[tokio::test]
    async fn startup_check_failure_can_be_surfaced_by_policy() {
        let h = harness_with(
            StaticReleases::failing("offline"),
            CannedTransport::ok_in_chunks(10, 10),
            Arc::new(FixedPrompt(InstallChoice::InstallLater)),
            |config| config.notify_on_auto_check_failure = true,
        );

        h.coordinator.run_startup_check().await;
        assert_eq!(h.coordinator.snapshot().phase, UpdatePhase::Error);
        assert_eq!(h.channel.payloads_of(EVENT_UPDATE_ERROR).len(), 1);
    }

    #[tokio::test]
    async fn startup_check_is_skipped_in_development_mode() {
        let h = harness_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(10, 10),
            Arc::new(FixedPrompt(InstallChoice::InstallLater)),
            |config| config.development_mode = true,
        );
        assert_eq!(
            h.coordinator.run_startup_check().await,
            StartupCheck::SkippedDevelopmentMode
        );
        assert!(h.channel.names().is_empty());
    }

    #[tokio::test]
    async fn events_are_dropped_when_no_window_exists() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );
        h.channel.detach();

        assert!(h.coordinator.check_for_updates().await.unwrap().available);
        h.channel.attach();
        assert!(h.channel.names().is_empty());
    }

    #[test]
    fn restart_relaunches_from_any_phase() {
        let h = harness(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(10, 10),
            InstallChoice::InstallLater,
        );
        h.coordinator.restart_app();
        assert_eq!(*h.process.relaunches.lock().unwrap(), 1);
        assert!(!h.coordinator.cancel_download());
    }
}
