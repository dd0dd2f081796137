use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::Serialize;

use crate::{append_desktop_log, update_events::ShellEvent, ShellError, ShellResult};

/// A bound hotkey and the UI-visible action it reports when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutRegistration {
    /// Canonical form, used for the OS binding and conflict checks.
    pub key: String,
    /// The key string as the UI sent it.
    pub requested_key: String,
    pub owner_token: String,
}

impl ShortcutRegistration {
    /// Press notification; echoes the key in the caller's own spelling.
    pub fn pressed_event(&self) -> ShellEvent {
        ShellEvent::GlobalShortcut {
            key: self.requested_key.clone(),
            action: self.owner_token.clone(),
        }
    }
}

/// OS-level global hotkey facility.
pub trait HotkeyBackend: Send + Sync {
    fn bind(&self, registration: &ShortcutRegistration) -> Result<(), String>;
    fn unbind(&self, key: &str) -> Result<(), String>;
}

const MODIFIER_ORDER: [&str; 5] = ["CMDORCTRL", "CONTROL", "ALT", "SHIFT", "SUPER"];

fn canonical_token(token: &str) -> String {
    let upper = token.to_ascii_uppercase();
    match upper.as_str() {
        "CTRL" => "CONTROL".to_string(),
        "OPTION" => "ALT".to_string(),
        "CMD" | "COMMAND" | "META" => "SUPER".to_string(),
        "COMMANDORCONTROL" | "COMMANDORCTRL" | "CMDORCONTROL" => "CMDORCTRL".to_string(),
        _ => upper,
    }
}

/// Normalizes a key combination so that `ctrl+a` and `Control+A` name the same
/// binding: upper-case, aliases folded, modifiers in a fixed order.
pub fn canonicalize_shortcut(raw: &str) -> ShellResult<String> {
    let invalid = |reason: &str| ShellError::InvalidShortcut {
        key: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("shortcut is empty"));
    }

    let mut modifiers = Vec::new();
    let mut key = None;
    for part in trimmed.split('+') {
        let part = part.trim();
        if part.is_empty() {
            return Err(invalid("empty key segment"));
        }
        let token = canonical_token(part);
        if MODIFIER_ORDER.contains(&token.as_str()) {
            if modifiers.contains(&token) {
                return Err(invalid("modifier repeated"));
            }
            modifiers.push(token);
        } else if key.replace(token).is_some() {
            return Err(invalid("more than one non-modifier key"));
        }
    }

    let key = key.ok_or_else(|| invalid("no non-modifier key"))?;
    modifiers.sort_by_key(|modifier| {
        MODIFIER_ORDER
            .iter()
            .position(|known| known == modifier)
            .unwrap_or(MODIFIER_ORDER.len())
    });
    modifiers.push(key);
    Ok(modifiers.join("+"))
}

#[derive(Default)]
struct RegistryState {
    entries: BTreeMap<String, ShortcutRegistration>,
    suspended: bool,
}

/// Process-wide hotkey registry. The lock is held across the backend call so
/// that register and unregister of one key never interleave.
pub struct ShortcutRegistry {
    backend: Arc<dyn HotkeyBackend>,
    state: Mutex<RegistryState>,
}

impl ShortcutRegistry {
    pub fn new(backend: Arc<dyn HotkeyBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(RegistryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, raw_key: &str, owner_token: &str) -> ShellResult<ShortcutRegistration> {
        let key = canonicalize_shortcut(raw_key)?;
        let mut state = self.state();
        if let Some(existing) = state.entries.get(&key) {
            return Err(ShellError::RegistrationConflict(format!(
                "{key} is already bound to '{}'",
                existing.owner_token
            )));
        }

        let registration = ShortcutRegistration {
            key: key.clone(),
            requested_key: raw_key.trim().to_string(),
            owner_token: owner_token.to_string(),
        };
        if !state.suspended {
            self.backend.bind(&registration).map_err(|error| {
                ShellError::RegistrationConflict(format!("Failed to bind {key}: {error}"))
            })?;
        }
        state.entries.insert(key.clone(), registration.clone());
        append_desktop_log(&format!("registered global shortcut {key} -> {owner_token}"));
        Ok(registration)
    }

    /// Returns whether the key was registered.
    pub fn unregister(&self, raw_key: &str) -> ShellResult<bool> {
        let key = canonicalize_shortcut(raw_key)?;
        let mut state = self.state();
        if state.entries.remove(&key).is_none() {
            return Ok(false);
        }
        if !state.suspended {
            if let Err(error) = self.backend.unbind(&key) {
                append_desktop_log(&format!("failed to unbind global shortcut {key}: {error}"));
            }
        }
        append_desktop_log(&format!("unregistered global shortcut {key}"));
        Ok(true)
    }

    pub fn unregister_all(&self) {
        let mut state = self.state();
        let entries = std::mem::take(&mut state.entries);
        if !state.suspended {
            for key in entries.keys() {
                if let Err(error) = self.backend.unbind(key) {
                    append_desktop_log(&format!("failed to unbind global shortcut {key}: {error}"));
                }
            }
        }
        if !entries.is_empty() {
            append_desktop_log(&format!("unregistered {} global shortcut(s)", entries.len()));
        }
    }

    /// Releases every OS binding but keeps the entries. New registrations made
    /// while suspended are recorded and bound on resume.
    pub fn suspend_all(&self) {
        let mut state = self.state();
        if state.suspended {
            return;
        }
        for key in state.entries.keys() {
            if let Err(error) = self.backend.unbind(key) {
                append_desktop_log(&format!("failed to suspend global shortcut {key}: {error}"));
            }
        }
        state.suspended = true;
        append_desktop_log("global shortcuts suspended");
    }

    /// Rebinds every entry. Returns the keys the OS refused; those stay in the
    /// registry without an OS binding.
    pub fn resume_all(&self) -> Vec<String> {
        let mut state = self.state();
        if !state.suspended {
            return Vec::new();
        }
        let mut failed = Vec::new();
        for registration in state.entries.values() {
            if let Err(error) = self.backend.bind(registration) {
                append_desktop_log(&format!(
                    "failed to resume global shortcut {}: {error}",
                    registration.key
                ));
                failed.push(registration.key.clone());
            }
        }
        state.suspended = false;
        append_desktop_log("global shortcuts resumed");
        failed
    }

    pub fn is_suspended(&self) -> bool {
        self.state().suspended
    }

    pub fn registrations(&self) -> Vec<ShortcutRegistration> {
        self.state().entries.values().cloned().collect()
    }

    pub fn lookup(&self, raw_key: &str) -> Option<ShortcutRegistration> {
        let key = canonicalize_shortcut(raw_key).ok()?;
        self.state().entries.get(&key).cloned()
    }
}
