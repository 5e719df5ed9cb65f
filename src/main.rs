//! Hardsub - interactive subtitle burn-in
//!
//! Fetches a video, lets the user pick an audio track and a subtitle source,
//! renders a hardsubbed copy with ffmpeg and uploads it with rclone.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{debug, info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hardsub::cli::Args;
use hardsub::config::Config;
use hardsub::error::HardsubError;
use hardsub::prompt::StdinPrompter;
use hardsub::workflow::Workflow;

const DEFAULT_CONFIG_FILE: &str = "hardsub.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.log_dir.as_deref())?;

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(work_dir) = args.work_dir {
        config.work_dir = work_dir;
    }
    debug!("Working directory: {}", config.work_dir.display());

    let workflow = Workflow::new(config)?;
    let mut prompter = StdinPrompter::new();

    match workflow.run(&mut prompter).await {
        Ok(()) => Ok(()),
        Err(e @ HardsubError::MissingDependency { .. }) => {
            println!("ERROR: {}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Console logging on stderr so it never interleaves with the prompts,
/// plus a daily rotated file when a log directory is given
fn setup_logging(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::WARN };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = rolling::daily(dir, "hardsub.log");
            let (non_blocking_file, guard) = non_blocking(file_appender);
            // Keep the guard alive for the duration of the program
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_target(false)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(dir) = log_dir {
        info!("Logging to {}", dir.join("hardsub.log").display());
    }
    Ok(())
}
