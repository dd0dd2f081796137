pub const TRAY_MENU_SHOW_WINDOW: &str = "tray_show_window";
pub const TRAY_MENU_MACRO_SYSTEM_STATUS: &str = "tray_macro_system_status";
pub const TRAY_MENU_PRESETS_STATUS: &str = "tray_presets_status";
pub const TRAY_MENU_TOGGLE_HOTKEYS: &str = "tray_toggle_hotkeys";
pub const TRAY_MENU_MINIMIZE_TO_TRAY: &str = "tray_minimize_to_tray";
pub const TRAY_MENU_SHOW_NOTIFICATIONS: &str = "tray_show_notifications";
pub const TRAY_MENU_START_WITH_SYSTEM: &str = "tray_start_with_system";
pub const TRAY_MENU_CHECK_FOR_UPDATES: &str = "tray_check_for_updates";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    ShowWindow,
    ToggleHotkeys,
    ToggleMinimizeToTray,
    ToggleShowNotifications,
    ToggleStartWithSystem,
    CheckForUpdates,
    Quit,
}

pub fn start_with_system_label() -> &'static str {
    if cfg!(target_os = "windows") {
        "Start with Windows"
    } else {
        "Start at Login"
    }
}

/// Status rows are disabled labels and map to no action.
pub fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    match menu_id {
        TRAY_MENU_SHOW_WINDOW => Some(TrayMenuAction::ShowWindow),
        TRAY_MENU_TOGGLE_HOTKEYS => Some(TrayMenuAction::ToggleHotkeys),
        TRAY_MENU_MINIMIZE_TO_TRAY => Some(TrayMenuAction::ToggleMinimizeToTray),
        TRAY_MENU_SHOW_NOTIFICATIONS => Some(TrayMenuAction::ToggleShowNotifications),
        TRAY_MENU_START_WITH_SYSTEM => Some(TrayMenuAction::ToggleStartWithSystem),
        TRAY_MENU_CHECK_FOR_UPDATES => Some(TrayMenuAction::CheckForUpdates),
        TRAY_MENU_QUIT => Some(TrayMenuAction::Quit),
        _ => None,
    }
}
