use std::time::Duration;

pub const APP_DISPLAY_NAME: &str = "Mersace's Macro Manager";
pub const DOWNLOAD_DIR_NAME: &str = "MersaceMacroManager";
pub const ARTIFACT_NAME_PREFIX: &str = "Mersace-Macro-Manager";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const TRAY_ID: &str = "macro-manager-tray";
pub const DEFAULT_GLOBAL_SHORTCUT: &str = "F1";
pub const DEFAULT_SHORTCUT_ACTION: &str = "toggle";

pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub const DEFAULT_RELEASE_PROVIDER: &str = "github";
pub const DEFAULT_RELEASE_OWNER: &str = "mutvayzz-sys";
pub const DEFAULT_RELEASE_REPO: &str = "Mersace-Macro-manager";
pub const GITHUB_API_BASE: &str = "https://api.github.com";

pub const AUTO_UPDATE_CHECK_DELAY: Duration = Duration::from_secs(3);
pub const RELEASE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_DOWNLOAD_STALL_TIMEOUT: Duration = Duration::from_secs(60);

pub const EVENT_GLOBAL_SHORTCUT: &str = "global-shortcut";
pub const EVENT_CHECKING: &str = "checking";
pub const EVENT_UPDATE_AVAILABLE: &str = "update-available";
pub const EVENT_UPDATE_NOT_AVAILABLE: &str = "update-not-available";
pub const EVENT_DOWNLOAD_PROGRESS: &str = "download-progress";
pub const EVENT_UPDATE_DOWNLOADED: &str = "update-downloaded";
pub const EVENT_UPDATE_ERROR: &str = "update-error";
