use std::{
    env,
    path::{Path, PathBuf},
};

use crate::app_constants::{ARTIFACT_NAME_PREFIX, DOWNLOAD_DIR_NAME};

#[cfg(target_os = "windows")]
pub const INSTALLER_EXTENSION: &str = "exe";
#[cfg(target_os = "macos")]
pub const INSTALLER_EXTENSION: &str = "dmg";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const INSTALLER_EXTENSION: &str = "AppImage";

pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(env::temp_dir)
}

/// Versions come from the network or the UI; keep only characters that are
/// safe inside a single path component.
pub fn sanitize_version_for_file_name(version: &str) -> String {
    let sanitized: String = version
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | '+') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('.').to_string();
    if sanitized.is_empty() {
        "unknown".to_string()
    } else {
        sanitized
    }
}

pub fn artifact_file_name(version: &str, extension: &str) -> String {
    format!(
        "{ARTIFACT_NAME_PREFIX}-{}-Setup.{extension}",
        sanitize_version_for_file_name(version)
    )
}

/// `<downloads>/MersaceMacroManager/Mersace-Macro-Manager-<version>-Setup.<ext>`
pub fn artifact_path(downloads_dir: &Path, version: &str) -> PathBuf {
    downloads_dir
        .join(DOWNLOAD_DIR_NAME)
        .join(artifact_file_name(version, INSTALLER_EXTENSION))
}
