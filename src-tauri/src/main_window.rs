use macro_manager_shell_core::origin_policy;
use tauri::{webview::PageLoadEvent, AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{append_desktop_log, APP_DISPLAY_NAME, MAIN_WINDOW_LABEL};

const DESKTOP_BRIDGE_SCRIPT: &str = include_str!("desktop_bridge.js");

fn dev_server_url(app_handle: &AppHandle) -> Option<Url> {
    if cfg!(debug_assertions) {
        app_handle.config().build.dev_url.clone()
    } else {
        None
    }
}

fn inject_desktop_bridge(window: &WebviewWindow, url: &Url) {
    if let Err(error) = window.eval(DESKTOP_BRIDGE_SCRIPT) {
        append_desktop_log(&format!("failed to inject desktop bridge into {url}: {error}"));
    }
}

pub fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    let dev_url = dev_server_url(app_handle);
    let navigation_dev_url = dev_url.clone();
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(APP_DISPLAY_NAME)
    .inner_size(1200.0, 900.0)
    .min_inner_size(800.0, 600.0)
    .visible(false)
    .on_navigation(move |url| {
        let allowed = origin_policy::is_app_origin(url, navigation_dev_url.as_ref());
        if !allowed {
            append_desktop_log(&format!("blocked navigation away from app origin: {url}"));
        }
        allowed
    })
    .on_page_load(move |window, payload| {
        let url = payload.url();
        let app_origin = origin_policy::is_app_origin(url, dev_url.as_ref());
        match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {url}"));
                if app_origin {
                    inject_desktop_bridge(&window, url);
                }
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {url}"));
                if app_origin {
                    inject_desktop_bridge(&window, url);
                } else {
                    append_desktop_log(&format!("desktop bridge withheld from {url}"));
                }
                if let Err(error) = window.show() {
                    append_desktop_log(&format!("failed to show main window after load: {error}"));
                }
            }
        }
    })
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if matches!(window.is_minimized(), Ok(true)) {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to unminimize main window: {error}"));
        }
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("hide_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
}
