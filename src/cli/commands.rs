use crate::content::TriggerType;
use clap::{Parser, Subcommand};

/// `Ruach Compass` - adaptive coaching backend and reset-protocol player.
#[derive(Parser, Debug)]
#[command(name = "ruach-compass")]
#[command(version)]
#[command(about = "Adaptive coaching API with safety gating and offline fallbacks.", long_about = None)]
pub struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API (health, quests, scripts, reset, safety)
    Serve {
        /// Port to listen on (use 0 for random available port; default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Run the safety gate on a piece of text and print the verdict as JSON
    SafetyCheck {
        /// Free text to screen
        text: String,
    },

    /// Play a reset protocol in the terminal (Enter skips, p pauses, q quits)
    Reset {
        /// What set you off: jealousy, uncertainty, anger, shame, loneliness, overwhelm
        #[arg(short, long)]
        trigger: TriggerType,

        /// One or two sentences of context for the model
        #[arg(short, long)]
        context: Option<String>,

        /// Use the built-in protocol without calling the model
        #[arg(long)]
        offline: bool,
    },

    /// Print the SHA-256 hex of a bearer token for `[[gateway.users]]`
    HashToken {
        /// Plaintext token
        token: String,
    },
}
