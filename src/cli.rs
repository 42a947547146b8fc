//! Command-line interface definitions
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Parser, Subcommand};

/// Sezanlight - LED controller client
///
/// Set and observe the color of a Sezanlight LED controller.
#[derive(Parser)]
#[command(name = "sezanlight")]
#[command(version)]
#[command(about = "Sezanlight - Set and observe the color of a remote LED controller")]
#[command(after_help = "\
BEHAVIOR:
  - Colors are entered as 0-255 per channel and scaled to the controller's
    native range (clr_range) before sending, truncating toward zero
  - clr_range is read from the controller; until it is known, 255 is used
  - Non-numeric channel values count as 0
  - Empty config values are not sent; port values <= 0 are dropped

COLOR:
  sezanlight color get           Show the controller's current color
  sezanlight color set R G B     Send a color (0-255 per channel)

CONFIG:
  sezanlight config get          Show the controller's settings
  sezanlight config set K=V ...  Change controller settings
  sezanlight restart             Restart the controller service

SESSION:
  sezanlight                     Show color and settings (same as: status)
  sezanlight interactive         Line-driven control session
  sezanlight validate            Validate the local config file

LOCAL CONFIG:
  $XDG_CONFIG_HOME/sezanlight/config.toml")]
pub struct Args {
    /// Controller URL, overrides the config file (e.g. http://10.0.0.5:3546)
    #[arg(long, global = true)]
    pub controller: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Show the controller's color and settings
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Read or set the light color
    #[command(subcommand)]
    Color(ColorCommand),

    /// Read or change the controller's settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Restart the controller service (no confirmation is returned)
    Restart,

    /// Line-driven control session
    Interactive,

    /// Validate config file (local, no controller needed)
    Validate,
}

/// Color subcommands
#[derive(Subcommand)]
pub enum ColorCommand {
    /// Show the controller's current color
    Get {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Send a color, 0-255 per channel
    Set {
        /// Red (0-255)
        #[arg(allow_hyphen_values = true)]
        r: String,
        /// Green (0-255)
        #[arg(allow_hyphen_values = true)]
        g: String,
        /// Blue (0-255)
        #[arg(allow_hyphen_values = true)]
        b: String,
    },
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the controller's settings
    Get {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Change settings, given as KEY=VALUE
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        values: Vec<String>,
    },
}
