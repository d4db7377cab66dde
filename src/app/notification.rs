//! Transient notifications
//!
//! A notification is shown after every user-visible outcome and hides itself
//! after a configured delay. Raising a new notification cancels the pending
//! dismissal of the previous one, so the new message always gets its full
//! display time.
//!
//! The delay is driven through [`DismissTimer`] so tests and view layers can
//! supply their own clock.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

/// Notification as seen by the view layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    fn shown(message: String, kind: NotificationKind) -> Self {
        Self {
            visible: true,
            message,
            kind,
        }
    }
}

/// Handle to an armed timer; dropping it leaves the timer running
pub struct PendingDismiss {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl PendingDismiss {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the timer; its callback will not run
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Schedules the auto-dismiss callback
pub trait DismissTimer: Send + Sync {
    /// Run `on_elapsed` once after `delay`, unless the returned handle is cancelled first
    fn arm(&self, delay: Duration, on_elapsed: Box<dyn FnOnce() + Send>) -> PendingDismiss;
}

/// Timer backed by a tokio task; must be armed from within a runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl DismissTimer for TokioTimer {
    fn arm(&self, delay: Duration, on_elapsed: Box<dyn FnOnce() + Send>) -> PendingDismiss {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_elapsed();
        });
        PendingDismiss::new(move || handle.abort())
    }
}

type PendingCallback = (u64, Box<dyn FnOnce() + Send>);

/// Timer that only fires when told to
///
/// For view layers that run their own clock, and for tests.
#[derive(Clone, Default)]
pub struct ManualTimer {
    inner: Arc<Mutex<ManualTimerState>>,
}

#[derive(Default)]
struct ManualTimerState {
    next_id: u64,
    pending: Vec<PendingCallback>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed, uncancelled callbacks
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Run every armed callback
    pub fn fire_all(&self) {
        let due = std::mem::take(&mut self.lock().pending);
        for (_, callback) in due {
            callback();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualTimerState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DismissTimer for ManualTimer {
    fn arm(&self, _delay: Duration, on_elapsed: Box<dyn FnOnce() + Send>) -> PendingDismiss {
        let id = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = state.next_id;
            state.pending.push((id, on_elapsed));
            id
        };

        let inner = Arc::clone(&self.inner);
        PendingDismiss::new(move || {
            inner
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pending
                .retain(|(pending_id, _)| *pending_id != id);
        })
    }
}

#[derive(Default)]
struct Slot {
    notification: Notification,
    generation: u64,
}

/// Owns the current notification and its dismissal
pub struct Notifier {
    slot: Arc<RwLock<Slot>>,
    timer: Arc<dyn DismissTimer>,
    dismiss_after: Duration,
    pending: Option<PendingDismiss>,
}

impl Notifier {
    pub fn new(timer: Arc<dyn DismissTimer>, dismiss_after: Duration) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot::default())),
            timer,
            dismiss_after,
            pending: None,
        }
    }

    /// Show a notification, replacing the current one
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }

        let generation = {
            let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
            slot.generation += 1;
            slot.notification = Notification::shown(message.into(), kind);
            slot.generation
        };

        // The generation check covers a callback that was already running
        // when it got cancelled.
        let slot = Arc::clone(&self.slot);
        self.pending = Some(self.timer.arm(
            self.dismiss_after,
            Box::new(move || {
                let mut slot = slot.write().unwrap_or_else(|e| e.into_inner());
                if slot.generation == generation {
                    slot.notification = Notification::default();
                }
            }),
        ));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Error);
    }

    /// Hide the current notification now
    pub fn dismiss(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        slot.generation += 1;
        slot.notification = Notification::default();
    }

    /// Snapshot of the current notification
    pub fn current(&self) -> Notification {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .notification
            .clone()
    }
}
