use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    tray::{MouseButton, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use tauri_plugin_autostart::ManagerExt;
use tauri_plugin_notification::NotificationExt;

use crate::{
    append_desktop_log, tray_actions, tray_menu_handler, window_actions, TrayMenuState,
    APP_DISPLAY_NAME, TRAY_ID,
};

const TRAY_TOOLTIP: &str = "Mersace's Macro Manager - Gaming Macros";
const TRAY_NOTICE_BODY: &str = "Application minimized to tray. Click the tray icon to restore.";

fn menu_item(app_handle: &AppHandle, id: &str, text: &str, enabled: bool) -> Result<MenuItem<tauri::Wry>, String> {
    MenuItem::with_id(app_handle, id, text, enabled, None::<&str>)
        .map_err(|error| format!("Failed to create tray menu item {id}: {error}"))
}

fn check_item(app_handle: &AppHandle, id: &str, text: &str, checked: bool) -> Result<CheckMenuItem<tauri::Wry>, String> {
    CheckMenuItem::with_id(app_handle, id, text, true, checked, None::<&str>)
        .map_err(|error| format!("Failed to create tray check item {id}: {error}"))
}

fn separator(app_handle: &AppHandle) -> Result<PredefinedMenuItem<tauri::Wry>, String> {
    PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))
}

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let show_item = menu_item(
        app_handle,
        tray_actions::TRAY_MENU_SHOW_WINDOW,
        &format!("Show {APP_DISPLAY_NAME}"),
        true,
    )?;

    let macro_system_item = menu_item(
        app_handle,
        tray_actions::TRAY_MENU_MACRO_SYSTEM_STATUS,
        "Macro System: Ready",
        false,
    )?;
    let presets_item = menu_item(
        app_handle,
        tray_actions::TRAY_MENU_PRESETS_STATUS,
        "Presets: Loaded",
        false,
    )?;
    let hotkeys_item = check_item(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_HOTKEYS,
        "Toggle Global Hotkeys",
        true,
    )?;
    let macro_status_menu = Submenu::with_items(
        app_handle,
        "Macro Status",
        true,
        &[
            &macro_system_item,
            &presets_item,
            &separator(app_handle)?,
            &hotkeys_item,
        ],
    )
    .map_err(|error| format!("Failed to build macro status submenu: {error}"))?;

    let minimize_to_tray_item = check_item(
        app_handle,
        tray_actions::TRAY_MENU_MINIMIZE_TO_TRAY,
        "Minimize to Tray",
        true,
    )?;
    let show_notifications_item = check_item(
        app_handle,
        tray_actions::TRAY_MENU_SHOW_NOTIFICATIONS,
        "Show Notifications",
        true,
    )?;
    let start_with_system = app_handle.autolaunch().is_enabled().unwrap_or_else(|error| {
        append_desktop_log(&format!("failed to read autostart state: {error}"));
        false
    });
    let start_with_system_item = check_item(
        app_handle,
        tray_actions::TRAY_MENU_START_WITH_SYSTEM,
        tray_actions::start_with_system_label(),
        start_with_system,
    )?;
    let settings_menu = Submenu::with_items(
        app_handle,
        "Settings",
        true,
        &[
            &minimize_to_tray_item,
            &show_notifications_item,
            &start_with_system_item,
        ],
    )
    .map_err(|error| format!("Failed to build settings submenu: {error}"))?;

    let check_updates_item = menu_item(
        app_handle,
        tray_actions::TRAY_MENU_CHECK_FOR_UPDATES,
        "Check for Updates",
        true,
    )?;
    let quit_item = menu_item(app_handle, tray_actions::TRAY_MENU_QUIT, "Quit", true)?;

    let menu = Menu::with_items(
        app_handle,
        &[
            &show_item,
            &separator(app_handle)?,
            &macro_status_menu,
            &separator(app_handle)?,
            &settings_menu,
            &separator(app_handle)?,
            &check_updates_item,
            &quit_item,
        ],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        hotkeys_item: hotkeys_item.clone(),
        minimize_to_tray_item: minimize_to_tray_item.clone(),
        show_notifications_item: show_notifications_item.clone(),
        start_with_system_item: start_with_system_item.clone(),
    }) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(TRAY_TOOLTIP)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } = event
            {
                window_actions::show_main_window(tray.app_handle(), append_desktop_log);
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;
    Ok(())
}

/// The one-time "still running in the tray" notice.
pub fn show_tray_notice(app_handle: &AppHandle) {
    if let Err(error) = app_handle
        .notification()
        .builder()
        .title(APP_DISPLAY_NAME)
        .body(TRAY_NOTICE_BODY)
        .show()
    {
        append_desktop_log(&format!("failed to show tray notification: {error}"));
    }
}
