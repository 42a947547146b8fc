//! Per-session context
//!
//! Everything the page used to keep in globals, owned in one place and
//! shared with the sync client.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::status::StatusReporter;
use crate::store::ConfigStore;
use crate::ui::Form;

/// State of one control session
#[derive(Debug)]
pub struct Session {
    pub store: ConfigStore,
    pub status: StatusReporter,
    form: Mutex<Form>,
}

impl Session {
    /// New session with empty inputs, default color range and idle status
    #[must_use]
    pub fn new(form: Form, hide_after: Duration) -> Self {
        Self {
            store: ConfigStore::new(),
            status: StatusReporter::new(hide_after),
            form: Mutex::new(form),
        }
    }

    /// Lock the form. Never hold the guard across an `.await`.
    pub fn form(&self) -> MutexGuard<'_, Form> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Form::default(), crate::status::DEFAULT_HIDE_AFTER)
    }
}
