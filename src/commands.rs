//! CLI commands
//!
//! Each command drives the sync client the way the control page does:
//! load config and color, act, then show the resulting status.

use color_eyre::eyre::{self, Result};
use crossterm::style::Stylize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::client::{SyncClient, config_payload};
use crate::color::{DeviceColor, DisplayColor, to_device};
use crate::config::Config;
use crate::session::Session;
use crate::status::{Outcome, Status};
use crate::store::RemoteConfig;
use crate::style::{SezanlightStyle, status_line, swatch};
use crate::transport::HttpTransport;
use crate::ui::Form;

/// Client used by the CLI
pub type Client = SyncClient<HttpTransport>;

/// Build a session and client for the configured controller
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn connect(config: &Config) -> Result<Client> {
    let transport = HttpTransport::new(config.settings.controller.clone())?;
    let form = Form::new(config.settings.config_fields.iter().cloned());
    let session = Arc::new(Session::new(form, config.settings.status_hide));
    Ok(SyncClient::new(transport, session))
}

/// Split `KEY=VALUE`
///
/// # Errors
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => eyre::bail!("Expected KEY=VALUE, got '{arg}'"),
    }
}

fn unreachable_controller<T>(client: &Client, what: &str) -> Result<T> {
    eyre::bail!(
        "Could not read {what} from {} (is the controller running?)",
        client.transport().base()
    )
}

/// Fail if the controller rejected the write
fn finish_write(outcome: &Outcome) -> Result<()> {
    debug!("Write finished: {:?}", outcome);
    match Status::for_outcome(outcome, false) {
        Some(Status::Message(message)) => eyre::bail!("Controller answered: {message}"),
        _ => Ok(()),
    }
}

fn print_color(device: DeviceColor, display: DisplayColor, clr_range: u32, preview: &str) {
    println!(
        "{} {}  {} {} {} {}",
        "Color:".dim(),
        swatch(display),
        display.r.to_string().bold(),
        display.g.to_string().bold(),
        display.b.to_string().bold(),
        format!("({preview})").dim()
    );
    println!(
        "{} {} {}",
        "Device:".dim(),
        device.to_string().technical(),
        format!("of {clr_range}").dim()
    );
}

fn print_config(config: &RemoteConfig) {
    if config.is_empty() {
        println!("{}", "No settings reported".warning());
        return;
    }
    let width = config.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in config.iter() {
        let key = format!("{key:width$}");
        println!("  {}  {}", key.technical(), RemoteConfig::field_text(value));
    }
}

fn color_json(device: DeviceColor, display: DisplayColor) -> serde_json::Value {
    json!({
        "display": { "r": display.r, "g": display.g, "b": display.b },
        "device": device,
    })
}

// ============================================================================
// One-shot Commands
// ============================================================================

/// Show color and settings, fetched concurrently like on page load
///
/// # Errors
/// Returns an error if the color cannot be read or JSON serialization fails.
pub async fn status(client: &Client, json_output: bool) -> Result<()> {
    // Same as SyncClient::initialize, but keeps the fetched device color
    let (_, device) = tokio::join!(client.fetch_config(), client.fetch_color());
    let Some(device) = device else {
        return unreachable_controller(client, "color");
    };
    print_status(client, device, json_output)
}

fn print_status(client: &Client, device: DeviceColor, json_output: bool) -> Result<()> {
    let session = client.session();
    let config = session.store.get();
    let form = session.form();
    let display = form.display_color();

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "controller": client.transport().base().as_str(),
                "clr_range": config.clr_range(),
                "color": color_json(device, display),
                "preview": form.preview(),
                "config": &*config,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Light".header());
    println!("{}", "-".repeat(5));
    print_color(device, display, config.clr_range(), form.preview());
    println!();
    println!("{}", "Controller".header());
    println!("{}", "-".repeat(10));
    println!("{} {}", "Address:".dim(), client.transport().base().as_str().technical());
    print_config(&config);
    Ok(())
}

/// Show the controller's current color
///
/// # Errors
/// Returns an error if the color cannot be read.
pub async fn color_get(client: &Client, json_output: bool) -> Result<()> {
    // Range first, so the color is scaled with the real clr_range
    client.fetch_config().await;
    let Some(device) = client.fetch_color().await else {
        return unreachable_controller(client, "color");
    };

    let session = client.session();
    let form = session.form();
    let display = form.display_color();
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&color_json(device, display))?
        );
    } else {
        print_color(device, display, session.store.clr_range(), form.preview());
    }
    Ok(())
}

/// Send a color typed as three 0-255 fields
///
/// # Errors
/// Returns an error if the controller rejects the color.
pub async fn color_set(client: &Client, r: &str, g: &str, b: &str) -> Result<()> {
    if client.fetch_config().await.is_none() {
        println!(
            "{}",
            "Controller config unavailable, scaling with clr_range 255".warning()
        );
    }

    client.session().form().set_color_fields(r, g, b);
    let outcome = client.submit_form_color().await;
    finish_write(&outcome)?;

    let session = client.session();
    let display = session.form().display_color();
    let clr_range = session.store.clr_range();
    println!(
        "{} {} {}",
        "Sent".success(),
        swatch(display),
        to_device(display, clr_range).to_string().technical()
    );
    Ok(())
}

/// Show the controller's settings
///
/// # Errors
/// Returns an error if the settings cannot be read or JSON serialization fails.
pub async fn config_get(client: &Client, json_output: bool) -> Result<()> {
    let Some(config) = client.fetch_config().await else {
        return unreachable_controller(client, "config");
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&*config)?);
    } else {
        println!("{}", "Controller Settings".header());
        println!("{}", "-".repeat(19));
        print_config(&config);
    }
    Ok(())
}

/// Change controller settings given as `KEY=VALUE`
///
/// # Errors
/// Returns an error if an argument is malformed or the controller rejects the write.
pub async fn config_set(client: &Client, assignments: &[String]) -> Result<()> {
    let values = assignments
        .iter()
        .map(|arg| parse_assignment(arg))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let payload = config_payload(&values);
    for key in values.keys().filter(|k| !payload.contains_key(*k)) {
        println!("{} {}", "Not sent:".warning(), key.as_str().technical());
    }

    let outcome = client.submit_config(&values).await;
    finish_write(&outcome)?;
    println!("{}", status_line(&client.session().status.current()));
    if !payload.is_empty() {
        println!("Some settings only apply after: {}", "sezanlight restart".technical());
    }
    Ok(())
}

/// Ask the controller to restart
///
/// # Errors
/// Returns an error if the request task panicked.
pub async fn restart(client: &Client) -> Result<()> {
    client.restart().await?;
    println!("Restart requested at {}", client.transport().base().as_str().technical());
    Ok(())
}

// ============================================================================
// Interactive Session
// ============================================================================

const INTERACTIVE_HELP: &str = "\
  R G B            send a color (0-255 per channel)
  config           show the config fields
  config K=V ...   fill config fields and send them
  fetch            reload color and settings
  show             show the current form
  restart          restart the controller service
  quit             leave";

fn print_form(client: &Client) {
    let session = client.session();
    let form = session.form();
    let (r, g, b) = form.color_fields();
    println!(
        "{} {} r={r:?} g={g:?} b={b:?} {}",
        "Form:".dim(),
        swatch(form.display_color()),
        format!("({})", form.preview()).dim()
    );
    println!(
        "{} {}",
        "clr_range:".dim(),
        session.store.clr_range().to_string().technical()
    );
    for (key, value) in form.config_values() {
        println!("  {} = {value:?}", key.as_str().technical());
    }
}

/// Line-driven session: every status change is printed as it happens,
/// including success notes hiding themselves.
///
/// # Errors
/// Returns an error if stdin cannot be read.
pub async fn interactive(client: &Client) -> Result<()> {
    let mut events = client.session().status.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(status) => println!("{} {}", "status:".dim(), status_line(&status)),
                Err(RecvError::Lagged(skipped)) => debug!("Skipped {} status events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    client.initialize().await;
    print_form(client);
    println!("{}", INTERACTIVE_HELP.dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["help"] => println!("{INTERACTIVE_HELP}"),
            ["show"] => print_form(client),
            ["fetch"] => {
                client.initialize().await;
                print_form(client);
            }
            ["restart"] => {
                // Fire and forget: the prompt comes back right away
                drop(client.restart());
            }
            ["config"] => print_form(client),
            ["config", assignments @ ..] => {
                let mut unknown = Vec::new();
                for arg in assignments {
                    match parse_assignment(arg) {
                        Ok((key, value)) => {
                            if !client.session().form().set_config_field(&key, &value) {
                                unknown.push(key);
                            }
                        }
                        Err(e) => println!("{}", e.to_string().error()),
                    }
                }
                for key in unknown {
                    println!("{} {}", "No such config field:".warning(), key.technical());
                }
                // Answers arrive through the status printer
                drop(client.spawn_form_config());
            }
            [r, g, b] => {
                client.session().form().set_color_fields(r, g, b);
                drop(client.spawn_form_color());
            }
            _ => println!("{}", "Unknown input, type 'help'".warning()),
        }
    }

    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("raspberry_port=3546").unwrap(),
            ("raspberry_port".to_string(), "3546".to_string())
        );
        // Only the first '=' splits; empty values are allowed and filtered later
        assert_eq!(
            parse_assignment("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("clr_range=").unwrap(),
            ("clr_range".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("clr_range").is_err());
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn test_finish_write() {
        assert!(finish_write(&Outcome::new(200, "")).is_ok());

        let err = finish_write(&Outcome::new(409, "")).unwrap_err();
        assert_eq!(err.to_string(), "Controller answered: 409");

        let err = finish_write(&Outcome::new(200, "bad value")).unwrap_err();
        assert_eq!(err.to_string(), "Controller answered: bad value");
    }
}
