#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_runtime;
mod app_types;
mod desktop_bridge_commands;
mod host_capabilities;
mod main_window;
mod tray_actions;
mod tray_menu_handler;
mod tray_setup;
mod window_actions;

pub(crate) use app_types::{DesktopState, TrayMenuState};
pub(crate) use macro_manager_shell_core::app_constants::*;
pub(crate) use macro_manager_shell_core::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_update_log,
};

fn main() {
    app_runtime::run();
}
