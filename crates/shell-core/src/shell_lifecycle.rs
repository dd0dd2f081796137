use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide shell flags shared by the window, tray and exit handlers.
#[derive(Debug)]
pub struct ShellState {
    quitting: AtomicBool,
    tray_notice_shown: AtomicBool,
    minimize_to_tray: AtomicBool,
    show_notifications: AtomicBool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            quitting: AtomicBool::new(false),
            tray_notice_shown: AtomicBool::new(false),
            minimize_to_tray: AtomicBool::new(true),
            show_notifications: AtomicBool::new(true),
        }
    }
}

impl ShellState {
    pub fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    pub fn minimize_to_tray(&self) -> bool {
        self.minimize_to_tray.load(Ordering::SeqCst)
    }

    pub fn set_minimize_to_tray(&self, enabled: bool) {
        self.minimize_to_tray.store(enabled, Ordering::SeqCst);
    }

    pub fn show_notifications(&self) -> bool {
        self.show_notifications.load(Ordering::SeqCst)
    }

    pub fn set_show_notifications(&self, enabled: bool) {
        self.show_notifications.store(enabled, Ordering::SeqCst);
    }

    /// True exactly once per process.
    fn take_tray_notice(&self) -> bool {
        !self.tray_notice_shown.swap(true, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    HideToTray { show_tray_notice: bool },
    /// Not quitting yet but tray mode is off: run the quit path.
    Quit,
    AllowClose,
}

pub fn decide_close_request(state: &ShellState) -> CloseDecision {
    if state.is_quitting() {
        return CloseDecision::AllowClose;
    }
    if !state.minimize_to_tray() {
        return CloseDecision::Quit;
    }

    let show_tray_notice = state.show_notifications() && state.take_tray_notice();
    CloseDecision::HideToTray { show_tray_notice }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateDecision {
    CreateWindow,
    ShowAndFocus,
}

pub fn decide_activate(window_exists: bool) -> ActivateDecision {
    if window_exists {
        ActivateDecision::ShowAndFocus
    } else {
        ActivateDecision::CreateWindow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequestDecision {
    KeepRunning,
    Exit,
}

/// The last window closing is not a reason to exit; the tray keeps the
/// process alive until an explicit quit.
pub fn decide_exit_request(exit_code: Option<i32>, is_quitting: bool) -> ExitRequestDecision {
    if exit_code.is_none() && !is_quitting {
        ExitRequestDecision::KeepRunning
    } else {
        ExitRequestDecision::Exit
    }
}
