use std::{io, time::Duration};

use thiserror::Error;

use crate::update_session::UpdatePhase;

/// Every failure the shell can report across the bridge.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Global shortcut conflict: {0}")]
    RegistrationConflict(String),

    #[error("Invalid global shortcut '{key}': {reason}")]
    InvalidShortcut { key: String, reason: String },

    #[error("An update check or download is already in progress")]
    SessionBusy,

    #[error("Cannot {operation} while the update session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: UpdatePhase,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Refusing insecure download URL '{0}', only https is allowed")]
    InsecureUrl(String),

    #[error("Download cancelled")]
    Cancelled,

    #[error("Timed out after {}s without progress", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Unknown(String),
}

pub type ShellResult<T> = Result<T, ShellError>;

impl ShellError {
    /// Stable name of the error category, surfaced to the UI as `errorKind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Timeout(_) => "NetworkError",
            Self::HttpStatus { .. } => "HttpStatusError",
            Self::Filesystem(_) => "FilesystemError",
            Self::RegistrationConflict(_) => "RegistrationConflict",
            Self::InvalidShortcut { .. } => "InvalidShortcut",
            Self::SessionBusy => "SessionBusy",
            Self::InvalidPhase { .. } => "InvalidPhase",
            Self::InvalidRequest(_) | Self::InsecureUrl(_) => "InvalidRequest",
            Self::Cancelled => "Cancelled",
            Self::Unknown(_) => "UnknownError",
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(error: io::Error) -> Self {
        Self::Filesystem(error.to_string())
    }
}

impl From<reqwest::Error> for ShellError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        if error.is_decode() {
            return Self::Unknown(format!("Malformed response: {error}"));
        }
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(error: serde_json::Error) -> Self {
        Self::Unknown(format!("Malformed response: {error}"))
    }
}
