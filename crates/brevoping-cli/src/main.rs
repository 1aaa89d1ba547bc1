//! BrevoPing CLI: entry point.
//!
//! # Commands
//!
//! - `brevoping serve`: run the webhook gateway
//! - `brevoping dispatch [FILE]`: push one webhook payload through the pipeline
//! - `brevoping format [FILE]`: print the notification text for a payload
//! - `brevoping status`: show configuration and channel status
//! - `brevoping init`: write a default config file

mod dispatch_cmd;
mod gateway;
mod helpers;
mod init;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use brevoping_core::config::load_config;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🔔 BrevoPing: notify your team about new Brevo contacts
#[derive(Parser)]
#[command(name = "brevoping", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.brevoping/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook gateway
    #[command(alias = "gateway")]
    Serve {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Dispatch one webhook payload (file or stdin) to the enabled channels
    Dispatch {
        /// Payload file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Skip the Brevo contact lookup
        #[arg(long, default_value_t = false)]
        no_enrich: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Print the notification message for a payload without sending it
    Format {
        /// Payload file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Show configuration and channel status
    Status,

    /// Create a default config file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { logs } => {
            init_logging(logs);
            gateway::run(load_config(config_path)).await
        }
        Commands::Dispatch {
            file,
            no_enrich,
            logs,
        } => {
            init_logging(logs);
            dispatch_cmd::run(load_config(config_path), file.as_deref(), !no_enrich).await
        }
        Commands::Format { file } => dispatch_cmd::format(file.as_deref()),
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("brevoping=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
