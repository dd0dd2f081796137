use macro_manager_shell_core::shell_lifecycle::{decide_activate, ActivateDecision};
use tauri::{AppHandle, Manager};

use crate::{main_window, MAIN_WINDOW_LABEL};

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::show_main_window(app_handle, log);
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::hide_main_window(app_handle, log);
}

/// Reopen from the dock or a second launch: recreate the window when it was
/// destroyed, otherwise bring it forward.
pub fn activate_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let window_exists = app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some();
    match decide_activate(window_exists) {
        ActivateDecision::ShowAndFocus => main_window::show_main_window(app_handle, log),
        ActivateDecision::CreateWindow => {
            log("main window missing on activation, recreating");
            if let Err(error) = main_window::create_main_window(app_handle) {
                log(&error);
            }
        }
    }
}
