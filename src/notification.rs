use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long a notification stays up before it clears itself
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// How long the share button shows its "copied" state
pub const COPIED_TTL: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackKind {
    #[default]
    None,
    Error,
    Success,
    Info,
}

/// The message currently shown under the form. `Feedback::default()` is the
/// "nothing to show" state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn new(
        text: impl Into<String>,
        kind: FeedbackKind,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn is_empty(&self) -> bool { self.kind == FeedbackKind::None && self.text.is_empty() }
}

/// A single pending delayed action. Scheduling a new one aborts whatever was
/// pending, and dropping the timer aborts it too, so a timer never outlives the
/// widget that owns it.
///
/// Aborting is not enough on its own on a multi-threaded runtime: the old task
/// may already be past its `sleep` by the time `abort` is called. Callers
/// should also check a generation number inside `on_fire`.
#[derive(Debug, Default)]
pub struct DismissTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DismissTimer {
    /// Must be called from within a tokio runtime
    pub fn schedule<F>(
        &self,
        delay: Duration,
        on_fire: F,
    ) where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        });
        let stale = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(stale) = stale {
            stale.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(task) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) { self.cancel() }
}
