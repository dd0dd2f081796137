use std::{env, path::PathBuf, time::Duration};

use crate::{
    app_constants::{
        AUTO_UPDATE_CHECK_DELAY, DEFAULT_DOWNLOAD_STALL_TIMEOUT, DEFAULT_RELEASE_OWNER,
        DEFAULT_RELEASE_PROVIDER, DEFAULT_RELEASE_REPO, GITHUB_API_BASE,
    },
    artifact_paths,
};

pub const UPDATE_OWNER_ENV: &str = "MACRO_MANAGER_UPDATE_OWNER";
pub const UPDATE_REPO_ENV: &str = "MACRO_MANAGER_UPDATE_REPO";
pub const UPDATE_PRIVATE_ENV: &str = "MACRO_MANAGER_UPDATE_PRIVATE";
pub const UPDATE_TOKEN_ENV: &str = "MACRO_MANAGER_UPDATE_TOKEN";
pub const NOTIFY_AUTO_CHECK_FAILURE_ENV: &str = "MACRO_MANAGER_NOTIFY_AUTO_CHECK_FAILURE";
pub const DOWNLOAD_TIMEOUT_SECS_ENV: &str = "MACRO_MANAGER_DOWNLOAD_TIMEOUT_SECS";
pub const DOWNLOADS_DIR_ENV: &str = "MACRO_MANAGER_DOWNLOADS_DIR";

/// Where release metadata is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFeed {
    pub provider: String,
    pub owner: String,
    pub repo: String,
    pub private: bool,
    pub api_base: String,
    pub token: Option<String>,
}

impl Default for ReleaseFeed {
    fn default() -> Self {
        Self {
            provider: DEFAULT_RELEASE_PROVIDER.to_string(),
            owner: DEFAULT_RELEASE_OWNER.to_string(),
            repo: DEFAULT_RELEASE_REPO.to_string(),
            private: false,
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub feed: ReleaseFeed,
    pub current_version: String,
    pub development_mode: bool,
    pub auto_check_delay: Duration,
    /// When set, a failed startup check is surfaced like a manual one
    /// (session `Error` plus an `update-error` event) instead of only logged.
    pub notify_on_auto_check_failure: bool,
    pub download_stall_timeout: Option<Duration>,
    pub downloads_dir: PathBuf,
}

impl UpdaterConfig {
    pub fn new(current_version: impl Into<String>, development_mode: bool) -> Self {
        Self {
            feed: ReleaseFeed::default(),
            current_version: current_version.into(),
            development_mode,
            auto_check_delay: AUTO_UPDATE_CHECK_DELAY,
            notify_on_auto_check_failure: false,
            download_stall_timeout: Some(DEFAULT_DOWNLOAD_STALL_TIMEOUT),
            downloads_dir: artifact_paths::default_downloads_dir(),
        }
    }

    pub fn from_env(current_version: impl Into<String>, development_mode: bool) -> Self {
        Self::from_lookup(current_version, development_mode, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(
        current_version: impl Into<String>,
        development_mode: bool,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(current_version, development_mode);
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(owner) = non_empty(UPDATE_OWNER_ENV) {
            config.feed.owner = owner;
        }
        if let Some(repo) = non_empty(UPDATE_REPO_ENV) {
            config.feed.repo = repo;
        }
        if let Some(private) = non_empty(UPDATE_PRIVATE_ENV).and_then(|raw| parse_bool_flag(&raw)) {
            config.feed.private = private;
        }
        config.feed.token = non_empty(UPDATE_TOKEN_ENV);
        if let Some(notify) =
            non_empty(NOTIFY_AUTO_CHECK_FAILURE_ENV).and_then(|raw| parse_bool_flag(&raw))
        {
            config.notify_on_auto_check_failure = notify;
        }
        if let Some(raw) = non_empty(DOWNLOAD_TIMEOUT_SECS_ENV) {
            match raw.parse::<u64>() {
                Ok(0) => config.download_stall_timeout = None,
                Ok(secs) => config.download_stall_timeout = Some(Duration::from_secs(secs)),
                Err(_) => crate::append_update_log(&format!(
                    "ignoring invalid {DOWNLOAD_TIMEOUT_SECS_ENV}={raw}"
                )),
            }
        }
        if let Some(dir) = non_empty(DOWNLOADS_DIR_ENV) {
            config.downloads_dir = PathBuf::from(dir);
        }

        config
    }
}

pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
