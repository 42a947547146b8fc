//! Operation status reporting
//!
//! Turns the outcome of a write into the message the user sees. Success notes
//! hide themselves after a delay; errors stay until the next report.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay before a success note is hidden
pub const DEFAULT_HIDE_AFTER: Duration = Duration::from_millis(1000);

/// Text shown for a successful write with no response body
pub const SUCCESS_MARKER: &str = "success";

const EVENT_CAPACITY: usize = 64;

/// Status code and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: u16,
    pub body: String,
}

impl Outcome {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// What the page saw when a request failed below HTTP: status 0, no body
    #[must_use]
    pub fn transport_failure() -> Self {
        Self::new(0, "")
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// What is currently shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    /// Success note, hides itself
    Success,
    /// Error body or status code, stays until replaced
    Message(String),
}

impl Status {
    /// Status shown for `outcome`, or `None` if nothing is to be shown
    #[must_use]
    pub fn for_outcome(outcome: &Outcome, show_success_note: bool) -> Option<Self> {
        if !outcome.body.is_empty() {
            Some(Self::Message(outcome.body.clone()))
        } else if !outcome.is_ok() {
            Some(Self::Message(outcome.status.to_string()))
        } else if show_success_note {
            Some(Self::Success)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Success => f.write_str(SUCCESS_MARKER),
            Self::Message(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Default)]
struct Shown {
    status: Status,
    /// Bumped on every display; a timer only hides its own generation
    generation: u64,
    hide_timer: Option<JoinHandle<()>>,
}

/// Shows one status at a time and owns the single auto-hide timer.
///
/// Cloning yields another handle to the same status.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    shown: Arc<Mutex<Shown>>,
    events: broadcast::Sender<Status>,
    hide_after: Duration,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_AFTER)
    }
}

impl StatusReporter {
    #[must_use]
    pub fn new(hide_after: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shown: Arc::new(Mutex::new(Shown::default())),
            events,
            hide_after,
        }
    }

    /// Receive every status change, including auto-hides
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Status> {
        self.events.subscribe()
    }

    /// Status currently shown
    #[must_use]
    pub fn current(&self) -> Status {
        self.lock().status.clone()
    }

    /// Show the status for `outcome`.
    ///
    /// Every report replaces what is shown and cancels a pending auto-hide.
    /// A report with nothing to show clears the status. Must be called from
    /// within a tokio runtime when it may show a success note.
    pub fn report(&self, outcome: &Outcome, show_success_note: bool) {
        let status = Status::for_outcome(outcome, show_success_note).unwrap_or_default();

        let mut shown = self.lock();
        if let Some(timer) = shown.hide_timer.take() {
            timer.abort();
        }
        shown.generation += 1;
        let changed = shown.status != status;
        shown.status = status.clone();
        debug!("Status ({}): {:?}", shown.generation, status);

        if status == Status::Success {
            shown.hide_timer = Some(self.schedule_hide(shown.generation));
        }
        drop(shown);

        // Clearing an already clear status is not news
        if changed || status != Status::Idle {
            let _ = self.events.send(status);
        }
    }

    fn schedule_hide(&self, generation: u64) -> JoinHandle<()> {
        let shown = Arc::clone(&self.shown);
        let events = self.events.clone();
        let hide_after = self.hide_after;

        tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;

            let mut shown = shown.lock().unwrap_or_else(PoisonError::into_inner);
            if shown.generation != generation {
                return;
            }
            shown.status = Status::Idle;
            shown.hide_timer = None;
            drop(shown);

            let _ = events.send(Status::Idle);
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shown> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
