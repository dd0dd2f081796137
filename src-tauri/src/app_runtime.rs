use std::sync::Arc;

use macro_manager_shell_core::{
    artifact_download::{HttpsTransport, SecureDownloader},
    desktop_bridge::DesktopBridge,
    logging,
    release_feed::GithubReleaseSource,
    shell_lifecycle::{decide_close_request, decide_exit_request, CloseDecision, ExitRequestDecision, ShellState},
    shortcut_registry::ShortcutRegistry,
    system_info::SystemInfo,
    update_config::UpdaterConfig,
    update_coordinator::UpdateCoordinator,
    update_events::EventRelay,
};
use tauri::{AppHandle, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_update_log,
    host_capabilities::{DialogInstallPrompt, MainWindowChannel, TauriHotkeyBackend, TauriProcessControl},
    main_window, tray_menu_handler, tray_setup, window_actions, DesktopState,
    DEFAULT_GLOBAL_SHORTCUT, DEFAULT_SHORTCUT_ACTION, DESKTOP_LOG_FILE, DOWNLOAD_DIR_NAME,
    MAIN_WINDOW_LABEL,
};

fn build_desktop_state(app_handle: &AppHandle) -> Result<DesktopState, String> {
    let version = app_handle.package_info().version.to_string();
    let config = UpdaterConfig::from_env(version.as_str(), cfg!(debug_assertions));
    append_startup_log(&format!(
        "update feed: {}/{}/{} private={} downloads_dir={}",
        config.feed.provider,
        config.feed.owner,
        config.feed.repo,
        config.feed.private,
        config.downloads_dir.display()
    ));

    let user_agent = format!("{DOWNLOAD_DIR_NAME}/{version}");
    let releases = GithubReleaseSource::new(config.feed.clone(), &user_agent)
        .map_err(|error| format!("Failed to create release client: {error}"))?;
    let transport = HttpsTransport::new(&user_agent)
        .map_err(|error| format!("Failed to create download client: {error}"))?;

    let events = Arc::new(EventRelay::new(Arc::new(MainWindowChannel::new(
        app_handle.clone(),
    ))));
    let coordinator = Arc::new(UpdateCoordinator::new(
        config,
        Arc::new(releases),
        SecureDownloader::new(Arc::new(transport)),
        Arc::new(DialogInstallPrompt::new(app_handle.clone())),
        Arc::new(TauriProcessControl::new(app_handle.clone())),
        events.clone(),
    ));
    let shortcuts = Arc::new(ShortcutRegistry::new(Arc::new(TauriHotkeyBackend::new(
        app_handle.clone(),
        events,
    ))));

    let bridge = DesktopBridge::new(
        coordinator,
        shortcuts,
        None,
        SystemInfo::current(&version, tauri::VERSION),
    );
    Ok(DesktopState {
        bridge: Arc::new(bridge),
    })
}

fn handle_close_requested(app_handle: &AppHandle, api: &tauri::CloseRequestApi) {
    let state = app_handle.state::<ShellState>();
    match decide_close_request(&state) {
        CloseDecision::AllowClose => {}
        CloseDecision::Quit => {
            api.prevent_close();
            tray_menu_handler::quit_app(app_handle, "main window closed with minimize to tray off");
        }
        CloseDecision::HideToTray { show_tray_notice } => {
            api.prevent_close();
            window_actions::hide_main_window(app_handle, append_desktop_log);
            if show_tray_notice {
                tray_setup::show_tray_notice(app_handle);
            }
        }
    }
}

fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &tauri::ExitRequestApi) {
    let state = app_handle.state::<ShellState>();
    match decide_exit_request(code, state.is_quitting()) {
        ExitRequestDecision::KeepRunning => {
            api.prevent_exit();
            append_desktop_log("exit requested without quit, keeping tray process alive");
        }
        ExitRequestDecision::Exit => {
            state.mark_quitting();
            append_shutdown_log(&format!("exit requested with code {code:?}"));
        }
    }
}

fn handle_exit(app_handle: &AppHandle) {
    if let Some(state) = app_handle.try_state::<DesktopState>() {
        state.shortcuts().unregister_all();
    }
    append_shutdown_log("desktop process exiting, global shortcuts released");
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(logging::default_log_dir(), DESKTOP_LOG_FILE).display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, args, _cwd| {
            append_desktop_log(&format!(
                "second instance launched with {} argument(s), activating main window",
                args.len()
            ));
            window_actions::activate_main_window(app, append_desktop_log);
        }))
        .plugin(tauri_plugin_autostart::init(
            tauri_plugin_autostart::MacosLauncher::LaunchAgent,
            None,
        ))
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .manage(ShellState::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_system_info,
            crate::desktop_bridge_commands::desktop_bridge_register_global_shortcut,
            crate::desktop_bridge_commands::desktop_bridge_unregister_global_shortcut,
            crate::desktop_bridge_commands::desktop_bridge_simulate_key_press,
            crate::desktop_bridge_commands::desktop_bridge_check_for_updates,
            crate::desktop_bridge_commands::desktop_bridge_download_update,
            crate::desktop_bridge_commands::desktop_bridge_cancel_update_download,
            crate::desktop_bridge_commands::desktop_bridge_restart_app,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            if let WindowEvent::CloseRequested { api, .. } = event {
                handle_close_requested(window.app_handle(), api);
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let desktop_state = build_desktop_state(&app_handle)?;
            let coordinator = desktop_state.coordinator();
            let shortcuts = desktop_state.shortcuts();
            app_handle.manage(desktop_state);

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }
            main_window::create_main_window(&app_handle)?;

            if let Err(error) = shortcuts.register(DEFAULT_GLOBAL_SHORTCUT, DEFAULT_SHORTCUT_ACTION) {
                append_startup_log(&format!(
                    "failed to register default shortcut {DEFAULT_GLOBAL_SHORTCUT}: {error}"
                ));
            }

            tauri::async_runtime::spawn(async move {
                let outcome = coordinator.run_startup_check().await;
                append_update_log(&format!("startup update check: {outcome:?}"));
            });

            append_startup_log("desktop shell ready");
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                handle_exit(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                window_actions::activate_main_window(app_handle, append_desktop_log);
            }
            _ => {}
        });
}
