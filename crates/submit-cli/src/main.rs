use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submit_core::AppConfig;

mod commands;

use commands::simulate::Scenario;

#[derive(Parser)]
#[command(name = "submit-transition")]
#[command(author, version, about = "A submit button that morphs into a spinner and back")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal demo
    Run,
    /// Play a scripted scenario on virtual time and print each step
    Simulate {
        #[arg(short, long, value_enum, default_value_t = Scenario::Success)]
        scenario: Scenario,
        /// Virtual milliseconds between printed snapshots
        #[arg(long, default_value_t = 50)]
        step_ms: u64,
        /// Print JSON lines instead of a table
        #[arg(long)]
        json: bool,
        /// Sleep for each step so the output plays at real speed
        #[arg(long)]
        realtime: bool,
    },
    /// Print the configuration as TOML
    Config {
        /// Print the built-in defaults instead of the effective configuration
        #[arg(long)]
        default: bool,
        /// Also write it to the config path
        #[arg(long)]
        write: bool,
    },
}

/// Log to a file in the data dir while the terminal UI owns the screen,
/// to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_dir = config.log_dir();
        std::fs::create_dir_all(&log_dir)?;
        let appender = tracing_appender::rolling::never(log_dir, "submit-transition.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(match &cli.config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    });

    let interactive = matches!(cli.command, Some(Commands::Run) | None);
    let _guard = init_logging(&config, interactive)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            scenario,
            step_ms,
            json,
            realtime,
        }) => commands::simulate::run(&config, scenario, step_ms, json, realtime).await,
        Some(Commands::Config { default, write }) => {
            commands::config::run(&config, default, write)
        }
    }
}
