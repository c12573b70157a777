//! Logging setup shared by the executables.
//!
//! Records go to two sinks: the terminal, with coloured level tags, and the session log file,
//! with plain tags so the file stays greppable. Both prefix each record with the seconds elapsed
//! since the session epoch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::Colorize;
use log::{info, Level, Record};
use std::fmt::Arguments;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Modules which log every cycle at trace level. They never log below debug, so a trace run stays
/// readable.
const PER_CYCLE_TARGETS: [&str; 2] = ["drive_lib::drivetrain::sim", "drive_lib::telemetry"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Minimum log level must include `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A global logger has already been installed: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the global logger, writing to stdout and the session's log file.
///
/// `min_level` must be at least as verbose as `Info`. Only one logger can be installed per
/// process, so a second call fails with [`LoggerInitError::FernInitError`].
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            let tag = match record.level() {
                Level::Trace => "TRC".dimmed().italic(),
                Level::Debug => "DBG".dimmed(),
                Level::Info => "INF".normal(),
                Level::Warn => "WRN".yellow(),
                Level::Error => "ERR".red().bold(),
            };
            out.finish(format_args!("{}", format_record(&tag, message, record)))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_record(&plain_tag(record.level()), message, record)
            ))
        })
        .chain(log_file);

    let mut root = fern::Dispatch::new().level(min_level);
    for target in PER_CYCLE_TARGETS.iter() {
        root = root.level_for(*target, per_cycle_level(min_level));
    }

    root.chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Level for the per-cycle targets, never more verbose than the global level or debug.
fn per_cycle_level(min_level: LevelFilter) -> LevelFilter {
    min_level.min(LevelFilter::Debug)
}

fn plain_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

/// Debug and trace records carry their target, info and above do not.
fn format_record(tag: &dyn std::fmt::Display, message: &Arguments, record: &Record) -> String {
    let elapsed = session::get_elapsed_seconds();

    if record.level() > Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            elapsed,
            tag,
            record.target(),
            message
        )
    } else {
        format!("[{:10.6} {}] {}", elapsed, tag, message)
    }
}
