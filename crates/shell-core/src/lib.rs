//! Host-side logic of the Mersace's Macro Manager desktop shell.
//!
//! Everything in here is toolkit-agnostic: the Tauri binary plugs real window,
//! dialog, hotkey and process facilities into the capability traits exposed by
//! these modules.

pub mod app_constants;
pub mod app_types;
pub mod artifact_download;
pub mod artifact_paths;
pub mod desktop_bridge;
pub mod key_simulation;
pub mod logging;
pub mod origin_policy;
pub mod release_feed;
pub mod shell_error;
pub mod shell_lifecycle;
pub mod shortcut_registry;
pub mod system_info;
pub mod update_config;
pub mod update_coordinator;
pub mod update_events;
pub mod update_session;

pub use app_types::{AtomicFlagGuard, BridgeEnvelope, NoPayload};
pub use logging::{append_desktop_log, append_shutdown_log, append_startup_log, append_update_log};
pub use shell_error::{ShellError, ShellResult};
