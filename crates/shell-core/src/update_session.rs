use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::{release_feed::VersionInfo, ShellError, ShellResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatePhase {
    Idle,
    Checking,
    Available,
    NotAvailable,
    Downloading,
    Downloaded,
    Installing,
    Error,
}

impl UpdatePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Available => "available",
            Self::NotAvailable => "not-available",
            Self::Downloading => "downloading",
            Self::Downloaded => "downloaded",
            Self::Installing => "installing",
            Self::Error => "error",
        }
    }

    /// Phases during which a check or download owns the session.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Checking | Self::Downloading | Self::Downloaded)
    }
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionSnapshot {
    pub phase: UpdatePhase,
    pub pending_version_info: Option<VersionInfo>,
    pub downloaded_file_path: Option<PathBuf>,
    pub last_error: Option<String>,
}

/// The update state machine. Fields change only through the transition
/// methods below; each one validates the current phase first.
#[derive(Debug)]
pub struct UpdateSession {
    phase: UpdatePhase,
    pending_version_info: Option<VersionInfo>,
    downloaded_file_path: Option<PathBuf>,
    last_error: Option<String>,
    /// Phase and error in place when the running check began.
    check_origin: Option<(UpdatePhase, Option<String>)>,
}

impl Default for UpdateSession {
    fn default() -> Self {
        Self {
            phase: UpdatePhase::Idle,
            pending_version_info: None,
            downloaded_file_path: None,
            last_error: None,
            check_origin: None,
        }
    }
}

impl UpdateSession {
    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    pub fn pending_version_info(&self) -> Option<&VersionInfo> {
        self.pending_version_info.as_ref()
    }

    pub fn downloaded_file_path(&self) -> Option<&PathBuf> {
        self.downloaded_file_path.as_ref()
    }

    pub fn snapshot(&self) -> UpdateSessionSnapshot {
        UpdateSessionSnapshot {
            phase: self.phase,
            pending_version_info: self.pending_version_info.clone(),
            downloaded_file_path: self.downloaded_file_path.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn reject(&self, operation: &'static str) -> ShellError {
        if self.phase.is_busy() {
            ShellError::SessionBusy
        } else {
            ShellError::InvalidPhase {
                operation,
                phase: self.phase,
            }
        }
    }

    pub fn begin_check(&mut self) -> ShellResult<()> {
        match self.phase {
            UpdatePhase::Idle
            | UpdatePhase::NotAvailable
            | UpdatePhase::Available
            | UpdatePhase::Error => {
                self.check_origin = Some((self.phase, self.last_error.take()));
                self.phase = UpdatePhase::Checking;
                Ok(())
            }
            _ => Err(self.reject("check for updates")),
        }
    }

    /// Exact string comparison: any remote version different from the running
    /// one counts as an update.
    pub fn finish_check(&mut self, info: VersionInfo, current_version: &str) -> ShellResult<bool> {
        if self.phase != UpdatePhase::Checking {
            return Err(self.reject("finish an update check"));
        }

        let available = info.version != current_version;
        self.check_origin = None;
        self.phase = if available {
            UpdatePhase::Available
        } else {
            UpdatePhase::NotAvailable
        };
        self.pending_version_info = available.then_some(info);
        Ok(available)
    }

    pub fn begin_download(&mut self) -> ShellResult<VersionInfo> {
        if self.phase != UpdatePhase::Available {
            return Err(self.reject("download an update"));
        }
        let info = self
            .pending_version_info
            .clone()
            .ok_or_else(|| self.reject("download an update"))?;
        self.phase = UpdatePhase::Downloading;
        Ok(info)
    }

    pub fn finish_download(&mut self, file_path: PathBuf) -> ShellResult<()> {
        if self.phase != UpdatePhase::Downloading {
            return Err(self.reject("finish a download"));
        }
        self.phase = UpdatePhase::Downloaded;
        self.downloaded_file_path = Some(file_path);
        Ok(())
    }

    pub fn confirm_install(&mut self) -> ShellResult<PathBuf> {
        let path = match (self.phase, &self.downloaded_file_path) {
            (UpdatePhase::Downloaded, Some(path)) => path.clone(),
            _ => {
                return Err(ShellError::InvalidPhase {
                    operation: "install an update",
                    phase: self.phase,
                })
            }
        };
        self.phase = UpdatePhase::Installing;
        Ok(path)
    }

    /// "Install Later": back to idle, keeping the artifact path for a manual
    /// launch.
    pub fn defer_install(&mut self) -> ShellResult<()> {
        if self.phase != UpdatePhase::Downloaded {
            return Err(ShellError::InvalidPhase {
                operation: "defer an install",
                phase: self.phase,
            });
        }
        self.phase = UpdatePhase::Idle;
        self.pending_version_info = None;
        Ok(())
    }

    pub fn fail(&mut self, error: &ShellError) {
        self.phase = UpdatePhase::Error;
        self.last_error = Some(error.to_string());
        self.check_origin = None;
    }

    /// Drops a running check without a trace: the phase, error and pending
    /// release from before the check are back in place.
    pub fn abandon_check(&mut self) -> ShellResult<()> {
        if self.phase != UpdatePhase::Checking {
            return Err(ShellError::InvalidPhase {
                operation: "abandon an update check",
                phase: self.phase,
            });
        }
        let (phase, last_error) = self.check_origin.take().unwrap_or((UpdatePhase::Idle, None));
        self.phase = phase;
        self.last_error = last_error;
        Ok(())
    }
}
