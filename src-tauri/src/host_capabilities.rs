use std::{
    path::Path,
    process::{Command, Stdio},
    sync::Arc,
};

use async_trait::async_trait;
use macro_manager_shell_core::{
    shell_lifecycle::ShellState,
    shortcut_registry::{HotkeyBackend, ShortcutRegistration},
    update_coordinator::{InstallChoice, InstallPrompt, ProcessControl},
    update_events::{EventRelay, UiChannel},
    ShellError, ShellResult,
};
use serde_json::Value;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use crate::{append_desktop_log, append_shutdown_log, APP_DISPLAY_NAME, MAIN_WINDOW_LABEL};

/// Delivers notifications to the main window's webview, if one exists.
pub(crate) struct MainWindowChannel {
    app_handle: AppHandle,
}

impl MainWindowChannel {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl UiChannel for MainWindowChannel {
    fn is_attached(&self) -> bool {
        self.app_handle
            .get_webview_window(MAIN_WINDOW_LABEL)
            .is_some()
    }

    fn deliver(&self, event: &str, payload: Value) -> Result<(), String> {
        let window = self
            .app_handle
            .get_webview_window(MAIN_WINDOW_LABEL)
            .ok_or_else(|| "main window not found".to_string())?;
        window
            .emit(event, payload)
            .map_err(|error| format!("Failed to emit {event}: {error}"))
    }
}

pub(crate) struct TauriHotkeyBackend {
    app_handle: AppHandle,
    events: Arc<EventRelay>,
}

impl TauriHotkeyBackend {
    pub(crate) fn new(app_handle: AppHandle, events: Arc<EventRelay>) -> Self {
        Self { app_handle, events }
    }
}

impl HotkeyBackend for TauriHotkeyBackend {
    fn bind(&self, registration: &ShortcutRegistration) -> Result<(), String> {
        let events = self.events.clone();
        let pressed = registration.pressed_event();
        self.app_handle
            .global_shortcut()
            .on_shortcut(registration.key.as_str(), move |_app, _shortcut, event| {
                if event.state == ShortcutState::Pressed {
                    events.emit(&pressed);
                }
            })
            .map_err(|error| error.to_string())
    }

    fn unbind(&self, key: &str) -> Result<(), String> {
        self.app_handle
            .global_shortcut()
            .unregister(key)
            .map_err(|error| error.to_string())
    }
}

pub(crate) struct DialogInstallPrompt {
    app_handle: AppHandle,
}

impl DialogInstallPrompt {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

#[async_trait]
impl InstallPrompt for DialogInstallPrompt {
    async fn ask(&self, version: &str) -> InstallChoice {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        let mut dialog = self
            .app_handle
            .dialog()
            .message(format!(
                "{APP_DISPLAY_NAME} {version} has been downloaded successfully.\n\nWould you like to install the update now? The application will close during installation."
            ))
            .title("Update Downloaded")
            .kind(MessageDialogKind::Info)
            .buttons(MessageDialogButtons::OkCancelCustom(
                "Install Now".to_string(),
                "Install Later".to_string(),
            ));
        if let Some(window) = self.app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
            dialog = dialog.parent(&window);
        }
        dialog.show(move |install_now| {
            let _ = sender.send(install_now);
        });

        match receiver.await {
            Ok(true) => InstallChoice::InstallNow,
            _ => InstallChoice::InstallLater,
        }
    }
}

#[cfg(target_os = "macos")]
fn open_with_default_handler(path: &Path) -> Result<(), String> {
    Command::new("open")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
fn open_with_default_handler(path: &Path) -> Result<(), String> {
    Command::new("rundll32")
        .arg("url.dll,FileProtocolHandler")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_with_default_handler(path: &Path) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn open_with_default_handler(_path: &Path) -> Result<(), String> {
    Err("Opening downloaded installers is not supported on this platform.".to_string())
}

pub(crate) struct TauriProcessControl {
    app_handle: AppHandle,
}

impl TauriProcessControl {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn mark_quitting(&self) {
        if let Some(state) = self.app_handle.try_state::<ShellState>() {
            state.mark_quitting();
        }
    }
}

impl ProcessControl for TauriProcessControl {
    fn open_artifact(&self, path: &Path) -> ShellResult<()> {
        append_desktop_log(&format!("opening installer {}", path.display()));
        open_with_default_handler(path).map_err(ShellError::Filesystem)
    }

    fn exit(&self) {
        self.mark_quitting();
        append_shutdown_log("exiting desktop process for update install");
        self.app_handle.exit(0);
    }

    fn relaunch(&self) {
        self.mark_quitting();
        append_shutdown_log("restart requested, relaunching desktop process");
        self.app_handle.request_restart();
    }
}
