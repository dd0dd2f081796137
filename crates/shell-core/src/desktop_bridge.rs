use std::{
    any::Any,
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use futures::FutureExt;
use serde::Serialize;

use crate::{
    app_constants::DEFAULT_SHORTCUT_ACTION,
    append_desktop_log,
    key_simulation::{self, KeySimulator, SimulationOutcome},
    shortcut_registry::{ShortcutRegistration, ShortcutRegistry},
    system_info::SystemInfo,
    update_coordinator::{DownloadOutcome, DownloadUpdateOptions, UpdateCheckOutcome, UpdateCoordinator},
    BridgeEnvelope, NoPayload, ShellError, ShellResult,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnregisterOutcome {
    pub key: String,
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelOutcome {
    pub cancelled: bool,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn settle<T>(operation: &str, outcome: std::thread::Result<ShellResult<T>>) -> ShellResult<T> {
    let result = outcome.unwrap_or_else(|payload| {
        Err(ShellError::Unknown(format!(
            "{operation} panicked: {}",
            panic_message(payload.as_ref())
        )))
    });
    if let Err(error) = &result {
        append_desktop_log(&format!("bridge {operation} failed: {error}"));
    }
    result
}

fn run_guarded<T>(operation: &str, call: impl FnOnce() -> ShellResult<T>) -> ShellResult<T> {
    settle(operation, panic::catch_unwind(AssertUnwindSafe(call)))
}

async fn run_guarded_async<T, F>(operation: &str, call: F) -> ShellResult<T>
where
    F: Future<Output = ShellResult<T>>,
{
    settle(operation, AssertUnwindSafe(call).catch_unwind().await)
}

/// Host side of the UI bridge. Every operation answers with a
/// [`BridgeEnvelope`]; no error or panic escapes to the caller.
pub struct DesktopBridge {
    coordinator: Arc<UpdateCoordinator>,
    shortcuts: Arc<ShortcutRegistry>,
    key_simulator: Option<Arc<dyn KeySimulator>>,
    system_info: SystemInfo,
}

impl DesktopBridge {
    pub fn new(
        coordinator: Arc<UpdateCoordinator>,
        shortcuts: Arc<ShortcutRegistry>,
        key_simulator: Option<Arc<dyn KeySimulator>>,
        system_info: SystemInfo,
    ) -> Self {
        Self {
            coordinator,
            shortcuts,
            key_simulator,
            system_info,
        }
    }

    pub fn coordinator(&self) -> &Arc<UpdateCoordinator> {
        &self.coordinator
    }

    pub fn shortcuts(&self) -> &Arc<ShortcutRegistry> {
        &self.shortcuts
    }

    pub fn get_system_info(&self) -> BridgeEnvelope<SystemInfo> {
        BridgeEnvelope::ok(self.system_info.clone())
    }

    pub fn register_global_shortcut(&self, key: &str) -> BridgeEnvelope<ShortcutRegistration> {
        BridgeEnvelope::from_result(run_guarded("registerGlobalShortcut", || {
            self.shortcuts.register(key, DEFAULT_SHORTCUT_ACTION)
        }))
    }

    pub fn unregister_global_shortcut(&self, key: &str) -> BridgeEnvelope<UnregisterOutcome> {
        BridgeEnvelope::from_result(run_guarded("unregisterGlobalShortcut", || {
            let removed = self.shortcuts.unregister(key)?;
            Ok(UnregisterOutcome {
                key: key.to_string(),
                removed,
            })
        }))
    }

    pub fn simulate_key_press(&self, key: &str) -> BridgeEnvelope<SimulationOutcome> {
        BridgeEnvelope::from_result(run_guarded("simulateKeyPress", || {
            key_simulation::simulate_or_echo(self.key_simulator.as_deref(), key)
        }))
    }

    /// A failed check still reports `available: false` next to the error.
    pub async fn check_for_updates(&self) -> BridgeEnvelope<UpdateCheckOutcome> {
        match run_guarded_async("checkForUpdates", self.coordinator.check_for_updates()).await {
            Ok(outcome) => BridgeEnvelope::ok(outcome),
            Err(error) => BridgeEnvelope::failure_with(
                UpdateCheckOutcome {
                    available: false,
                    current_version: self.coordinator.current_version().to_string(),
                    version: None,
                    release_notes: None,
                },
                &error,
            ),
        }
    }

    pub async fn download_update(
        &self,
        options: DownloadUpdateOptions,
    ) -> BridgeEnvelope<DownloadOutcome> {
        BridgeEnvelope::from_result(
            run_guarded_async("downloadUpdate", self.coordinator.download_update(options)).await,
        )
    }

    pub fn cancel_update_download(&self) -> BridgeEnvelope<CancelOutcome> {
        BridgeEnvelope::from_result(run_guarded("cancelUpdateDownload", || {
            Ok(CancelOutcome {
                cancelled: self.coordinator.cancel_download(),
            })
        }))
    }

    pub fn restart_app(&self) -> BridgeEnvelope<NoPayload> {
        BridgeEnvelope::from_result(run_guarded("restartApp", || {
            self.coordinator.restart_app();
            Ok(NoPayload {})
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;
    use crate::{
        artifact_download::{testing::CannedTransport, SecureDownloader},
        key_simulation::testing::RecordingSimulator,
        shortcut_registry::testing::RecordingBackend,
        update_config::UpdaterConfig,
        update_coordinator::{
            testing::{FixedPrompt, RecordingProcess, StaticReleases},
            InstallChoice,
        },
        update_events::{testing::RecordingChannel, EventRelay},
    };

    struct PanickingSimulator;

    impl KeySimulator for PanickingSimulator {
        fn simulate(&self, _key_combination: &str) -> ShellResult<()> {
            panic!("input layer crashed")
        }
    }

    fn bridge_with(
        releases: StaticReleases,
        transport: CannedTransport,
        simulator: Option<Arc<dyn KeySimulator>>,
    ) -> (DesktopBridge, tempfile::TempDir) {
        let downloads = tempfile::tempdir().unwrap();
        let mut config = UpdaterConfig::new("1.1.0", false);
        config.downloads_dir = downloads.path().to_path_buf();
        config.auto_check_delay = Duration::ZERO;

        let coordinator = Arc::new(UpdateCoordinator::new(
            config,
            Arc::new(releases),
            SecureDownloader::new(Arc::new(transport)),
            Arc::new(FixedPrompt(InstallChoice::InstallLater)),
            Arc::new(RecordingProcess::default()),
            Arc::new(EventRelay::new(Arc::new(RecordingChannel::default()))),
        ));
        let shortcuts = Arc::new(ShortcutRegistry::new(Arc::new(RecordingBackend::default())));
        let bridge = DesktopBridge::new(
            coordinator,
            shortcuts,
            simulator,
            SystemInfo::current("1.1.0", "2.0.0"),
        );
        (bridge, downloads)
    }

    fn bridge() -> (DesktopBridge, tempfile::TempDir) {
        bridge_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(100, 50),
            None,
        )
    }

    fn to_json<T: Serialize>(envelope: &BridgeEnvelope<T>) -> Value {
        serde_json::to_value(envelope).unwrap()
    }

    #[test]
    fn shortcut_registration_round_trips_through_envelopes() {
        let (bridge, _downloads) = bridge();

        assert_eq!(
            to_json(&bridge.register_global_shortcut("ctrl+a")),
            json!({
                "success": true,
                "key": "CONTROL+A",
                "requestedKey": "ctrl+a",
                "ownerToken": "toggle"
            })
        );

        let conflict = to_json(&bridge.register_global_shortcut("Control+A"));
        assert_eq!(conflict["success"], false);
        assert_eq!(conflict["errorKind"], "RegistrationConflict");
        assert!(conflict["error"].as_str().unwrap().contains("CONTROL+A"));

        assert_eq!(
            to_json(&bridge.unregister_global_shortcut("ctrl+a")),
            json!({ "success": true, "key": "ctrl+a", "removed": true })
        );
    }

    #[test]
    fn invalid_shortcut_is_reported_not_thrown() {
        let (bridge, _downloads) = bridge();
        let reply = to_json(&bridge.register_global_shortcut("ctrl+"));
        assert_eq!(reply["success"], false);
        assert_eq!(reply["errorKind"], "InvalidShortcut");
    }

    #[test]
    fn key_press_without_simulator_echoes_key() {
        let (bridge, _downloads) = bridge();
        assert_eq!(
            to_json(&bridge.simulate_key_press("F5")),
            json!({ "success": true, "key": "F5", "simulated": false })
        );
    }

    #[test]
    fn key_press_reaches_installed_simulator() {
        let simulator = Arc::new(RecordingSimulator::default());
        let (bridge, _downloads) = bridge_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(100, 50),
            Some(simulator.clone()),
        );
        assert_eq!(to_json(&bridge.simulate_key_press("F5"))["simulated"], true);
        assert_eq!(*simulator.pressed.lock().unwrap(), vec!["F5".to_string()]);
    }

    #[test]
    fn panics_become_unknown_error_envelopes() {
        let (bridge, _downloads) = bridge_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::ok_in_chunks(100, 50),
            Some(Arc::new(PanickingSimulator)),
        );
        let reply = to_json(&bridge.simulate_key_press("F5"));
        assert_eq!(reply["success"], false);
        assert_eq!(reply["errorKind"], "UnknownError");
        assert!(reply["error"]
            .as_str()
            .unwrap()
            .contains("input layer crashed"));
    }

    #[tokio::test]
    async fn failed_check_is_soft() {
        let (bridge, _downloads) = bridge_with(
            StaticReleases::failing("offline"),
            CannedTransport::ok_in_chunks(100, 50),
            None,
        );
        let reply = to_json(&bridge.check_for_updates().await);
        assert_eq!(reply["success"], false);
        assert_eq!(reply["available"], false);
        assert_eq!(reply["currentVersion"], "1.1.0");
        assert_eq!(reply["errorKind"], "NetworkError");
    }

    #[tokio::test]
    async fn download_404_carries_status() {
        let (bridge, downloads) = bridge_with(
            StaticReleases::ok("1.2.0"),
            CannedTransport::status(404, "Not Found"),
            None,
        );
        assert_eq!(to_json(&bridge.check_for_updates().await)["available"], true);

        let reply = to_json(&bridge.download_update(DownloadUpdateOptions::default()).await);
        assert_eq!(reply["success"], false);
        assert_eq!(reply["status"], 404);
        assert_eq!(reply["errorKind"], "HttpStatusError");
        let expected = crate::artifact_paths::artifact_path(downloads.path(), "1.2.0");
        assert!(!expected.exists());
    }

    #[tokio::test]
    async fn download_after_check_reports_file_path() {
        let (bridge, _downloads) = bridge();
        bridge.check_for_updates().await;

        let reply = to_json(&bridge.download_update(DownloadUpdateOptions::default()).await);
        assert_eq!(reply["success"], true);
        assert_eq!(reply["install"], "install-later");
        assert!(reply["filePath"]
            .as_str()
            .unwrap()
            .contains("Mersace-Macro-Manager-1.2.0-Setup"));
    }

    #[test]
    fn cancel_without_download_reports_nothing_cancelled() {
        let (bridge, _downloads) = bridge();
        assert_eq!(
            to_json(&bridge.cancel_update_download()),
            json!({ "success": true, "cancelled": false })
        );
        assert_eq!(to_json(&bridge.restart_app()), json!({ "success": true }));
    }
}
