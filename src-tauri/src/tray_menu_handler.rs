use macro_manager_shell_core::shell_lifecycle::ShellState;
use tauri::{menu::CheckMenuItem, AppHandle, Manager};
use tauri_plugin_autostart::ManagerExt;

use crate::{
    append_desktop_log, append_shutdown_log, append_update_log, tray_actions, window_actions,
    DesktopState, TrayMenuState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HotkeyToggleDecision {
    Suspend,
    Resume,
    Unchanged,
}

fn decide_hotkey_toggle(checked: bool, currently_suspended: bool) -> HotkeyToggleDecision {
    match (checked, currently_suspended) {
        (true, true) => HotkeyToggleDecision::Resume,
        (false, false) => HotkeyToggleDecision::Suspend,
        _ => HotkeyToggleDecision::Unchanged,
    }
}

/// `Some(enable)` when the login item has to change to match the menu.
fn decide_autostart_change(checked: bool, currently_enabled: bool) -> Option<bool> {
    (checked != currently_enabled).then_some(checked)
}

fn toggle_start_with_system(app_handle: &AppHandle, item: &CheckMenuItem<tauri::Wry>) {
    let autolaunch = app_handle.autolaunch();
    let currently_enabled = autolaunch.is_enabled().unwrap_or_else(|error| {
        append_desktop_log(&format!("failed to read autostart state: {error}"));
        false
    });
    let checked = checked_state(item, !currently_enabled);
    let Some(enable) = decide_autostart_change(checked, currently_enabled) else {
        return;
    };

    let result = if enable {
        autolaunch.enable()
    } else {
        autolaunch.disable()
    };
    match result {
        Ok(()) => append_desktop_log(&format!(
            "tray toggled start with system: {}",
            if enable { "enabled" } else { "disabled" }
        )),
        Err(error) => {
            append_desktop_log(&format!("failed to update autostart: {error}"));
            if let Err(error) = item.set_checked(currently_enabled) {
                append_desktop_log(&format!("failed to revert autostart check item: {error}"));
            }
        }
    }
}

/// The menu flips a check item before the event arrives; read the new state
/// back, falling back to `default` if the item cannot be queried.
fn checked_state(item: &CheckMenuItem<tauri::Wry>, default: bool) -> bool {
    item.is_checked().unwrap_or_else(|error| {
        append_desktop_log(&format!("failed to read tray check item state: {error}"));
        default
    })
}

pub fn quit_app(app_handle: &AppHandle, reason: &str) {
    let state = app_handle.state::<ShellState>();
    state.mark_quitting();
    append_shutdown_log(&format!("{reason}, exiting desktop process"));
    app_handle.exit(0);
}

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ShowWindow) => {
            window_actions::activate_main_window(app_handle, append_desktop_log)
        }
        Some(tray_actions::TrayMenuAction::ToggleHotkeys) => {
            let menu_state = app_handle.state::<TrayMenuState>();
            let shortcuts = app_handle.state::<DesktopState>().shortcuts();
            let checked = checked_state(&menu_state.hotkeys_item, !shortcuts.is_suspended());
            match decide_hotkey_toggle(checked, shortcuts.is_suspended()) {
                HotkeyToggleDecision::Suspend => shortcuts.suspend_all(),
                HotkeyToggleDecision::Resume => {
                    let failed = shortcuts.resume_all();
                    if !failed.is_empty() {
                        append_desktop_log(&format!(
                            "tray resume left shortcuts unbound: {}",
                            failed.join(", ")
                        ));
                    }
                }
                HotkeyToggleDecision::Unchanged => {}
            }
        }
        Some(tray_actions::TrayMenuAction::ToggleMinimizeToTray) => {
            let menu_state = app_handle.state::<TrayMenuState>();
            let shell_state = app_handle.state::<ShellState>();
            let enabled = checked_state(
                &menu_state.minimize_to_tray_item,
                !shell_state.minimize_to_tray(),
            );
            shell_state.set_minimize_to_tray(enabled);
            append_desktop_log(&format!(
                "tray toggled minimize to tray: {}",
                if enabled { "enabled" } else { "disabled" }
            ));
        }
        Some(tray_actions::TrayMenuAction::ToggleShowNotifications) => {
            let menu_state = app_handle.state::<TrayMenuState>();
            let shell_state = app_handle.state::<ShellState>();
            let enabled = checked_state(
                &menu_state.show_notifications_item,
                !shell_state.show_notifications(),
            );
            shell_state.set_show_notifications(enabled);
            append_desktop_log(&format!(
                "tray toggled notifications: {}",
                if enabled { "enabled" } else { "disabled" }
            ));
        }
        Some(tray_actions::TrayMenuAction::ToggleStartWithSystem) => {
            let menu_state = app_handle.state::<TrayMenuState>();
            toggle_start_with_system(app_handle, &menu_state.start_with_system_item);
        }
        Some(tray_actions::TrayMenuAction::CheckForUpdates) => {
            window_actions::activate_main_window(app_handle, append_desktop_log);
            let coordinator = app_handle.state::<DesktopState>().coordinator();
            tauri::async_runtime::spawn(async move {
                if let Err(error) = coordinator.check_for_updates().await {
                    append_update_log(&format!("tray update check failed: {error}"));
                }
            });
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            quit_app(app_handle, "tray quit requested");
        }
        None => {}
    }
}
