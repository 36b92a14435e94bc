//! autosketch - draw an image onto a browser canvas through synthetic input

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use painting::{ControlSignals, DrawError, DrawOutcome, DrawingSession, RecordingActuator};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;

use config::{AppConfig, Cli};
use input::{select_backend, spawn_hotkey_reader};

const EXIT_FAILED: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

/// Host-side failures outside the drawing run itself
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("Failed to start {what}: {source}")]
    Spawn {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Drawing worker panicked")]
    WorkerPanicked,

    #[error("Failed to write plan to {path}: {source}")]
    PlanWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize plan: {0}")]
    PlanSerialize(#[from] serde_json::Error),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(DrawOutcome::Done) => ExitCode::SUCCESS,
        Ok(DrawOutcome::Cancelled) => ExitCode::from(EXIT_CANCELLED),
        Ok(DrawOutcome::Failed(_)) => ExitCode::from(EXIT_FAILED),
        Err(AppError::Draw(DrawError::Calibration(e))) if e.is_missing() => {
            error!("{}", e);
            error!("Run calibration first so the calibration files exist");
            ExitCode::from(EXIT_FAILED)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

fn run(cli: &Cli) -> Result<DrawOutcome, AppError> {
    let config = AppConfig::load(cli).map_err(DrawError::from)?;

    let signals = Arc::new(ControlSignals::new());
    match spawn_hotkey_reader(Arc::clone(&signals)) {
        Ok(_) => info!("Type 'p' + Enter to pause or resume, 'c' + Enter to cancel"),
        Err(e) => warn!("Hotkeys unavailable: {}", e),
    }

    let (tx, rx) = crossbeam_channel::unbounded::<String>();
    let AppConfig {
        image,
        region,
        mode,
        options,
        dry_run,
        plan_out,
    } = config;
    // Platform input handles may be tied to the thread that opened them
    let worker = thread::Builder::new()
        .name("drawing".into())
        .spawn(move || -> Result<_, DrawError> {
            let backend = select_backend(dry_run)?;
            let mut session = DrawingSession::new(image, region, mode, backend)
                .with_signals(signals)
                .with_options(options);
            let outcome = session.run(&mut |msg| {
                // The receiver only goes away if the host is shutting down
                let _ = tx.send(msg.to_string());
            });
            Ok((outcome, session.into_actuator().into_recording()))
        })
        .map_err(|source| AppError::Spawn {
            what: "drawing worker",
            source,
        })?;

    for msg in rx.iter() {
        println!("{}", msg);
    }

    let (outcome, recording) = worker.join().map_err(|_| AppError::WorkerPanicked)??;
    if let Some(recording) = &recording {
        info!(
            "Dry run recorded {} actions, {} strokes",
            recording.actions().len(),
            recording.strokes().len()
        );
        if let Some(path) = &plan_out {
            write_plan(recording, path)?;
        }
    }
    Ok(outcome)
}

fn write_plan(recording: &RecordingActuator, path: &Path) -> Result<(), AppError> {
    let json = recording.to_json()?;
    fs::write(path, json).map_err(|source| AppError::PlanWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote plan to {}", path.display());
    Ok(())
}
