use std::sync::Arc;

use macro_manager_shell_core::{
    desktop_bridge::DesktopBridge, shortcut_registry::ShortcutRegistry,
    update_coordinator::UpdateCoordinator,
};
use tauri::menu::CheckMenuItem;

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) hotkeys_item: CheckMenuItem<tauri::Wry>,
    pub(crate) minimize_to_tray_item: CheckMenuItem<tauri::Wry>,
    pub(crate) show_notifications_item: CheckMenuItem<tauri::Wry>,
    pub(crate) start_with_system_item: CheckMenuItem<tauri::Wry>,
}

pub(crate) struct DesktopState {
    pub(crate) bridge: Arc<DesktopBridge>,
}

impl DesktopState {
    pub(crate) fn coordinator(&self) -> Arc<UpdateCoordinator> {
        self.bridge.coordinator().clone()
    }

    pub(crate) fn shortcuts(&self) -> Arc<ShortcutRegistry> {
        self.bridge.shortcuts().clone()
    }
}
