//! `Sezanlight` - LED controller client
//!
//! Sets and observes the color of a Sezanlight LED controller over its HTTP
//! endpoints, and reads or edits the controller's runtime settings.
//!
//! # Features
//! - Color scaling between 0-255 input and the controller's native range (`clr_range`)
//! - `clr_range` read live from the controller's config for every write
//! - Status reporting with self-hiding success notes
//! - One-shot CLI commands and an interactive session
//!
//! # Endpoints
//! - `GET /color/get`, `GET /color/set/?r=&g=&b=`
//! - `GET /config`, `POST /config`
//! - `GET /restart`

pub mod cli;
pub mod client;
pub mod color;
pub mod commands;
pub mod config;
pub mod session;
pub mod status;
pub mod store;
pub mod style;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use cli::Args;
pub use client::SyncClient;
pub use color::{DeviceColor, DisplayColor};
pub use config::Config;
pub use session::Session;
pub use status::{Outcome, Status, StatusReporter};
pub use store::{ConfigStore, RemoteConfig};
pub use transport::{HttpTransport, Transport};
