use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;

use crate::app_constants::{DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, DOWNLOAD_DIR_NAME};

const LOG_DIR_ENV: &str = "MACRO_MANAGER_LOG_DIR";

pub fn default_log_dir() -> Option<PathBuf> {
    if let Ok(raw) = env::var(LOG_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::data_local_dir().map(|dir| dir.join(DOWNLOAD_DIR_NAME).join("logs"))
}

pub fn resolve_desktop_log_path(log_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    log_dir
        .unwrap_or_else(|| env::temp_dir().join(DOWNLOAD_DIR_NAME))
        .join(file_name)
}

fn format_log_line(category: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category,
        message
    )
}

fn rotate_if_oversized(path: &Path, max_bytes: u64) {
    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    if metadata.len() < max_bytes {
        return;
    }

    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    let _ = fs::rename(path, PathBuf::from(rotated));
}

/// Appends one line to `path`. Logging must never fail its caller, so every
/// I/O error is dropped here.
pub fn append_log_line(path: &Path, max_bytes: u64, category: &str, message: &str) {
    if cfg!(debug_assertions) {
        eprint!("{}", format_log_line(category, message));
    }

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    rotate_if_oversized(path, max_bytes);

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(format_log_line(category, message).as_bytes());
    }
}

#[cfg(not(test))]
fn desktop_log_path() -> PathBuf {
    resolve_desktop_log_path(default_log_dir(), DESKTOP_LOG_FILE)
}

// Unit tests never touch the user's real log.
#[cfg(test)]
fn desktop_log_path() -> PathBuf {
    resolve_desktop_log_path(
        Some(env::temp_dir().join(format!("{DOWNLOAD_DIR_NAME}-tests"))),
        DESKTOP_LOG_FILE,
    )
}

fn append_desktop_category(category: &str, message: &str) {
    append_log_line(&desktop_log_path(), DESKTOP_LOG_MAX_BYTES, category, message);
}

pub fn append_desktop_log(message: &str) {
    append_desktop_category("desktop", message);
}

pub fn append_startup_log(message: &str) {
    append_desktop_category("startup", message);
}

pub fn append_shutdown_log(message: &str) {
    append_desktop_category("shutdown", message);
}

pub fn append_update_log(message: &str) {
    append_desktop_category("update", message);
}
