use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::ShellError;

/// Uniform reply of every bridge operation: `{ success, ...payload }` or
/// `{ success: false, error, errorKind, status? }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct NoPayload {}

impl<T: Serialize> BridgeEnvelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
            error_kind: None,
            status: None,
        }
    }

    pub fn failure(error: &ShellError) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            status: error.status_code(),
        }
    }

    /// A failure that still carries a payload, e.g. `{ available: false }`
    /// for a soft update-check failure.
    pub fn failure_with(payload: T, error: &ShellError) -> Self {
        Self {
            payload: Some(payload),
            ..Self::failure(error)
        }
    }

    pub fn from_result(result: Result<T, ShellError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(error) => Self::failure(&error),
        }
    }
}

pub struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
