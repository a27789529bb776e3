//! Plinth CLI - host entry point for the bootstrap.
//!
//! # Startup
//!
//! ```text
//! main() -> init_tracing(console) -> PlinthConfig::load()
//!        -> AppContext + Ambient (host console provided up front)
//!        -> default_registry(settings).validate()
//!        -> install(..) exactly once -> print report
//! ```
//!
//! The debug console's tracing layer is composed into the subscriber before
//! anything runs; the `debug_console` initializer only flips it on.

mod report;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use plinth_config::PlinthConfig;
use plinth_core::{Ambient, AppContext, install};
use plinth_initializers::{DebugConsole, Settings, default_registry};

fn init_tracing(console: &DebugConsole) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_plinth_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(console.layer())
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, keep stdout clean for the report.
    tracing_subscriber::registry()
        .with(console.layer())
        .with(env_filter)
        .init();
}

fn open_plinth_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in plinth_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn plinth_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.plinth/logs/plinth.log
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".plinth").join("logs").join("plinth.log"));
    }

    // Fallback: ./.plinth/logs/plinth.log
    candidates.push(PathBuf::from(".plinth").join("logs").join("plinth.log"));

    candidates
}

fn main() -> Result<()> {
    let console = DebugConsole::new();
    init_tracing(&console);

    // `load` already warns on unreadable or malformed files.
    let config = PlinthConfig::load().ok().flatten();

    let registry = default_registry(Settings::from_config(config.as_ref()));
    registry
        .validate()
        .context("installer registry is malformed")?;

    let app_name = config
        .as_ref()
        .map_or_else(|| PlinthConfig::default().app_name(), PlinthConfig::app_name);
    let mut context = AppContext::new(app_name);
    let mut ambient = Ambient::new();
    ambient.provide(console);

    if let Err(err) = install(&registry, &mut context, &mut ambient) {
        tracing::error!(
            initializer = %err.name(),
            index = err.index(),
            cause = %err.cause(),
            "Bootstrap aborted"
        );
        return Err(err).context("bootstrap failed");
    }

    tracing::info!(app = context.name(), "Bootstrap complete");
    print!("{}", report::render(&registry, &context, &ambient));
    Ok(())
}
