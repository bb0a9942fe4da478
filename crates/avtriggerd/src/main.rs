//! avtriggerd — the digitized AV trigger.
//!
//! Serves events from the Lambda runtime API by default, or runs a single
//! event from a file for local debugging.
//!
//! # Usage
//!
//! ```text
//! ENV=dev APP_CONFIG_PATH=digitized_av_trigger avtriggerd
//! avtriggerd --stage dev --app-config-path digitized_av_trigger invoke --event s3_put.json
//! avtriggerd invoke --event sns_complete.json --dry-run
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod invoke;
mod runtime;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "avtriggerd", about = "Digitized AV trigger", version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve events from the Lambda runtime API (the default).
    Serve,
    /// Handle one event read from a JSON file and print the reply.
    Invoke {
        /// Path to the event payload.
        #[arg(long)]
        event: PathBuf,

        /// Print the planned action without loading configuration or
        /// calling the cluster.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_tracing(true);
            runtime::serve(&cli.settings).await
        }
        Command::Invoke { event, dry_run } => {
            init_tracing(false);
            invoke::invoke(&cli.settings, &event, dry_run).await
        }
    }
}

/// JSON lines under Lambda, human-readable output locally.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,avtrigger=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().with_current_span(false).without_time().init();
    } else {
        builder.init();
    }
}
