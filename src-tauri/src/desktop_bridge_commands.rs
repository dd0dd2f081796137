use macro_manager_shell_core::{
    desktop_bridge::{CancelOutcome, UnregisterOutcome},
    key_simulation::SimulationOutcome,
    shortcut_registry::ShortcutRegistration,
    system_info::SystemInfo,
    update_coordinator::{DownloadOutcome, DownloadUpdateOptions, UpdateCheckOutcome},
    BridgeEnvelope, NoPayload,
};
use tauri::{AppHandle, Manager};

use crate::DesktopState;

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_system_info(app_handle: AppHandle) -> BridgeEnvelope<SystemInfo> {
    let state = app_handle.state::<DesktopState>();
    state.bridge.get_system_info()
}

// Binding goes through the OS hotkey manager on the main thread; keep these
// off the command thread.
#[tauri::command]
pub(crate) async fn desktop_bridge_register_global_shortcut(
    app_handle: AppHandle,
    key: String,
) -> BridgeEnvelope<ShortcutRegistration> {
    let bridge = app_handle.state::<DesktopState>().bridge.clone();
    bridge.register_global_shortcut(&key)
}

#[tauri::command]
pub(crate) async fn desktop_bridge_unregister_global_shortcut(
    app_handle: AppHandle,
    key: String,
) -> BridgeEnvelope<UnregisterOutcome> {
    let bridge = app_handle.state::<DesktopState>().bridge.clone();
    bridge.unregister_global_shortcut(&key)
}

#[tauri::command]
pub(crate) fn desktop_bridge_simulate_key_press(
    app_handle: AppHandle,
    key: String,
) -> BridgeEnvelope<SimulationOutcome> {
    let state = app_handle.state::<DesktopState>();
    state.bridge.simulate_key_press(&key)
}

#[tauri::command]
pub(crate) async fn desktop_bridge_check_for_updates(
    app_handle: AppHandle,
) -> BridgeEnvelope<UpdateCheckOutcome> {
    let bridge = app_handle.state::<DesktopState>().bridge.clone();
    bridge.check_for_updates().await
}

#[tauri::command]
pub(crate) async fn desktop_bridge_download_update(
    app_handle: AppHandle,
    options: Option<DownloadUpdateOptions>,
) -> BridgeEnvelope<DownloadOutcome> {
    let bridge = app_handle.state::<DesktopState>().bridge.clone();
    bridge.download_update(options.unwrap_or_default()).await
}

#[tauri::command]
pub(crate) fn desktop_bridge_cancel_update_download(
    app_handle: AppHandle,
) -> BridgeEnvelope<CancelOutcome> {
    let state = app_handle.state::<DesktopState>();
    state.bridge.cancel_update_download()
}

#[tauri::command]
pub(crate) fn desktop_bridge_restart_app(app_handle: AppHandle) -> BridgeEnvelope<NoPayload> {
    let state = app_handle.state::<DesktopState>();
    state.bridge.restart_app()
}
