//! Controller synchronization
//!
//! Issues the remote operations and routes their results into the session:
//! reads update the store and the form, writes end in a status report.
//! Reads fail silently; the form just keeps what it had.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::color::{self, DeviceColor, DisplayColor};
use crate::session::Session;
use crate::status::Outcome;
use crate::store::RemoteConfig;
use crate::transport::{Transport, paths};

/// Client for one controller, bound to one session
#[derive(Debug)]
pub struct SyncClient<T> {
    transport: Arc<T>,
    session: Arc<Session>,
}

impl<T> Clone for SyncClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
        }
    }
}

impl<T: Transport> SyncClient<T> {
    pub fn new(transport: T, session: Arc<Session>) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch config and color concurrently.
    ///
    /// The two responses race: if the color lands first it is scaled with
    /// whatever range the store holds at that moment.
    pub async fn initialize(&self) {
        tokio::join!(self.fetch_config(), self.fetch_color());
    }

    /// Read the controller's color into the color inputs and refresh the
    /// preview. Returns `None` if the read failed.
    pub async fn fetch_color(&self) -> Option<DeviceColor> {
        let device: DeviceColor = self.read(paths::COLOR_GET).await?;

        let shown = color::to_display(device, self.session.store.clr_range());
        let mut form = self.session.form();
        form.set_display_color(shown);
        form.refresh_preview();
        debug!("Controller color {} shown as {:?}", device, shown);

        Some(device)
    }

    /// Read the controller's config into the store. Returns `None` if the
    /// read failed.
    pub async fn fetch_config(&self) -> Option<Arc<RemoteConfig>> {
        let config: RemoteConfig = self.read(paths::CONFIG).await?;
        let mut form = self.session.form();
        Some(self.session.store.replace(config, &mut form))
    }

    /// Scale `display` with the current color range and send it.
    ///
    /// Success is not announced; only errors reach the status.
    pub async fn submit_color(&self, display: DisplayColor) -> Outcome {
        let clr_range = self.session.store.clr_range();
        let device = color::to_device(display, clr_range);
        {
            let mut form = self.session.form();
            form.set_display_color(display);
            form.refresh_preview();
        }

        let query = [
            ("r", device.r.to_string()),
            ("g", device.g.to_string()),
            ("b", device.b.to_string()),
        ];
        let outcome = Self::settle(
            paths::COLOR_SET,
            self.transport.get(paths::COLOR_SET, &query).await,
        );
        self.session.status.report(&outcome, false);
        outcome
    }

    /// Send whatever is typed in the color inputs
    pub async fn submit_form_color(&self) -> Outcome {
        let display = self.session.form().display_color();
        self.submit_color(display).await
    }

    /// Send the non-empty config values. Announces success.
    pub async fn submit_config(&self, form_values: &BTreeMap<String, String>) -> Outcome {
        let payload = Value::Object(config_payload(form_values));
        let outcome = Self::settle(
            paths::CONFIG,
            self.transport.post_json(paths::CONFIG, &payload).await,
        );
        self.session.status.report(&outcome, true);
        outcome
    }

    /// Send the config inputs of the form
    pub async fn submit_form_config(&self) -> Outcome {
        let values = self.session.form().config_values().clone();
        self.submit_config(&values).await
    }

    /// Send the color inputs without waiting for the answer.
    ///
    /// The inputs are read now; the outcome is reported whenever it arrives.
    pub fn spawn_form_color(&self) -> JoinHandle<Outcome> {
        let display = self.session.form().display_color();
        let client = self.clone();
        tokio::spawn(async move { client.submit_color(display).await })
    }

    /// Send the config inputs without waiting for the answer
    pub fn spawn_form_config(&self) -> JoinHandle<Outcome> {
        let values = self.session.form().config_values().clone();
        let client = self.clone();
        tokio::spawn(async move { client.submit_config(&values).await })
    }

    /// Ask the controller to restart.
    ///
    /// Nothing is reported; the controller may go down before it answers.
    /// The handle only tells when the request has been dealt with.
    pub fn restart(&self) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.get(paths::RESTART, &[]).await {
                debug!("Restart request ended without response: {:#}", e);
            }
        })
    }

    async fn read<D: DeserializeOwned>(&self, path: &str) -> Option<D> {
        let outcome = match self.transport.get(path, &[]).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Reading {} failed: {:#}", path, e);
                return None;
            }
        };

        if !outcome.is_ok() {
            warn!("Reading {} returned status {}", path, outcome.status);
            return None;
        }

        serde_json::from_str(&outcome.body)
            .inspect_err(|e| warn!("Unreadable response from {}: {}", path, e))
            .ok()
    }

    fn settle(path: &str, result: color_eyre::eyre::Result<Outcome>) -> Outcome {
        result.unwrap_or_else(|e| {
            warn!("Writing {} failed: {:#}", path, e);
            Outcome::transport_failure()
        })
    }
}

/// Whether `key` names a port setting (`port`, `raspberry_port`, ...)
fn is_port_key(key: &str) -> bool {
    key == "port" || key.ends_with("_port")
}

/// A port value that is not positive. Blank text counts as 0.
fn is_bad_port(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.parse::<f64>().is_ok_and(|port| port <= 0.0)
}

/// Body of a config write.
///
/// Empty values are left out, as are port values that are numbers `<= 0`.
/// Everything else is sent as typed, whitespace included.
#[must_use]
pub fn config_payload(form_values: &BTreeMap<String, String>) -> Map<String, Value> {
    form_values
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter(|(key, value)| {
            let rejected = is_port_key(key) && is_bad_port(value);
            if rejected {
                debug!("Dropping {} = {:?} from config write", key, value);
            }
            !rejected
        })
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}
