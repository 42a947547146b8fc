//! Configuration management
//!
//! Handles loading, parsing, and validating the local TOML settings file:
//! which controller to talk to, logging, status timing and the config
//! fields the form offers.

use color_eyre::eyre::{self, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// ============================================================================
// Public Configuration Types
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
}

/// Client settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the controller's HTTP server
    pub controller: Url,
    pub log_level: String,
    /// How long a success note stays visible
    pub status_hide: Duration,
    /// Controller settings shown as form fields and back-filled on fetch
    pub config_fields: Vec<String>,
}

// ============================================================================
// Config File Deserialization (TOML)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsFile,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_controller")]
    controller: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_status_hide_ms")]
    status_hide_ms: u64,
    #[serde(default = "default_config_fields")]
    config_fields: Vec<String>,
}

fn default_controller() -> String {
    "http://raspberrypi.local:3546".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_status_hide_ms() -> u64 {
    1000
}

fn default_config_fields() -> Vec<String> {
    ["raspberry_ip", "raspberry_port", "clr_range"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            controller: default_controller(),
            log_level: default_log_level(),
            status_hide_ms: default_status_hide_ms(),
            config_fields: default_config_fields(),
        }
    }
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from the default XDG config path
    ///
    /// # Errors
    /// Returns an error if the file cannot be created, read, parsed or validated.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Creating default config at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {path:?}"))?;

        Self::from_toml(&contents).with_context(|| format!("Invalid config: {path:?}"))
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or a setting is invalid.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config_file: ConfigFile =
            toml::from_str(contents).wrap_err("Failed to parse config")?;
        Self::from_config_file(config_file)
    }

    fn from_config_file(config_file: ConfigFile) -> Result<Self> {
        let file = config_file.settings;

        let controller = Url::parse(&file.controller)
            .with_context(|| format!("Invalid controller URL: '{}'", file.controller))?;

        let settings = Settings {
            controller,
            log_level: file.log_level,
            status_hide: Duration::from_millis(file.status_hide_ms),
            config_fields: file.config_fields,
        };

        let config = Config { settings };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Validate log level
        match self.settings.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => eyre::bail!(
                "Invalid log_level '{level}'. Must be: error, warn, info, debug, or trace"
            ),
        }

        match self.settings.controller.scheme() {
            "http" | "https" => {}
            scheme => eyre::bail!("Controller URL must use http or https, not '{scheme}'"),
        }
        if self.settings.controller.host_str().is_none() {
            eyre::bail!("Controller URL has no host: '{}'", self.settings.controller);
        }

        if self.settings.status_hide.is_zero() {
            eyre::bail!("status_hide_ms must be greater than 0");
        }

        // No empty or duplicate field names
        let mut seen = HashSet::with_capacity(self.settings.config_fields.len());
        for field in &self.settings.config_fields {
            if field.trim().is_empty() {
                eyre::bail!("Empty name in config_fields");
            }
            if !seen.insert(field) {
                eyre::bail!("Duplicate config field: '{field}'");
            }
        }

        Ok(())
    }

    /// Replace the controller URL (from `--controller`)
    ///
    /// # Errors
    /// Returns an error if the URL is invalid.
    pub fn override_controller(&mut self, controller: &str) -> Result<()> {
        self.settings.controller = Url::parse(controller)
            .with_context(|| format!("Invalid controller URL: '{controller}'"))?;
        self.validate()
    }

    /// Get the XDG config path for Sezanlight
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined or created.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre::eyre!("Could not determine config directory"))?
            .join("sezanlight");
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config dir: {config_dir:?}"))?;
        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<()> {
        let default_config = r#"# Sezanlight Configuration
#
# Sets and reads the color of a Sezanlight LED controller over HTTP.

[settings]
controller = "http://raspberrypi.local:3546"   # Controller HTTP server (raspberry_ip:raspberry_port)
log_level = "warn"                             # error, warn, info, debug, trace
status_hide_ms = 1000                          # How long "success" stays visible

# Controller settings offered by 'sezanlight config set' and the interactive
# 'config' command. Fetched values are filled into these fields.
config_fields = ["raspberry_ip", "raspberry_port", "clr_range"]
"#;
        fs::write(path, default_config)
            .with_context(|| format!("Failed to write config: {path:?}"))?;

        // Inform user that we created the config
        eprintln!("Created default config at: {path:?}");
        eprintln!();
        eprintln!("Next steps:");
        eprintln!("  1. Set 'controller' to the address of your LED controller");
        eprintln!("  2. Run 'sezanlight validate' to check your config");
        eprintln!("  3. Run 'sezanlight' to see the current color");
        eprintln!();

        Ok(())
    }

    /// Print a human-readable summary of the configuration
    pub fn print_summary(&self) {
        println!("✓ Configuration valid\n");

        println!("Settings:");
        println!("  controller: {}", self.settings.controller);
        println!("  log_level: {}", self.settings.log_level);
        println!("  status_hide_ms: {}", self.settings.status_hide.as_millis());

        if self.settings.config_fields.is_empty() {
            println!("\nNo config fields configured.");
        } else {
            println!("\nConfig fields ({}):", self.settings.config_fields.len());
            for (i, field) in self.settings.config_fields.iter().enumerate() {
                println!("  {}. {}", i + 1, field);
            }
        }

        if let Ok(path) = Self::get_config_path() {
            println!("\nConfig: {path:?}");
        }
    }
}
