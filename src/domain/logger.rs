//! Logging system and event sink.

use anyhow::Result;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::macros::format_description;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Prefix of rolling log files.
const LOG_FILE_PREFIX: &str = "chainconf";

/// How long rolled log files are kept.
const LOG_RETENTION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Logging options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Log at debug level
    pub debug: bool,
    /// Only log errors
    pub quiet: bool,
    /// Additionally write daily rolling log files here
    pub log_dir: Option<PathBuf>,
}

impl LogSettings {
    fn default_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        }
    }
}

/// Initialize the logging system.
pub fn init(settings: &LogSettings) -> Result<()> {
    // Use local timezone for timestamps
    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(local_offset, time_format);

    let filter = EnvFilter::builder()
        .with_default_directive(settings.default_level().into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_timer(timer.clone());

    let pruned = match &settings.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            prune_logs(dir)?
        }
        None => 0,
    };

    let file = settings.log_dir.as_ref().map(|dir| {
        fmt::layer()
            .with_writer(RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(timer)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    if pruned > 0 {
        debug!("Removed {} expired log files", pruned);
    }
    Ok(())
}

/// Remove this tool's log files that have not been written to within
/// [`LOG_RETENTION`].
///
/// Returns how many files were removed. A missing directory is not an
/// error; entries that cannot be inspected or removed are skipped.
pub fn prune_logs(log_dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let ours = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !ours {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        // A modification time in the future has no age
        let stale = metadata.is_file()
            && metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .is_some_and(|age| age > LOG_RETENTION);

        if stale && fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }

    Ok(removed)
}

/// Receiver of human-readable progress and failure events.
pub trait EventSink {
    /// Record an informational event, optionally with a structured payload.
    fn info(&self, message: &str, payload: Option<&Value>);

    /// Record a failure together with its cause.
    fn error(&self, message: &str, cause: &dyn Error);
}

/// Sink that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, message: &str, payload: Option<&Value>) {
        match payload {
            Some(payload) => info!("{}\n{:#}", message, payload),
            None => info!("{}", message),
        }
    }

    fn error(&self, message: &str, cause: &dyn Error) {
        error!("{}: {}", message, cause);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::RefCell;

    /// A recorded sink event.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Info {
            message: String,
            payload: Option<Value>,
        },
        Error {
            message: String,
            cause: String,
        },
    }

    /// Sink that keeps every event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: RefCell<Vec<Event>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        pub fn infos(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Info { message, .. } => Some(message),
                    Event::Error { .. } => None,
                })
                .collect()
        }

        pub fn errors(&self) -> Vec<(String, String)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Error { message, cause } => Some((message, cause)),
                    Event::Info { .. } => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn info(&self, message: &str, payload: Option<&Value>) {
            self.events.borrow_mut().push(Event::Info {
                message: message.to_string(),
                payload: payload.cloned(),
            });
        }

        fn error(&self, message: &str, cause: &dyn Error) {
            self.events.borrow_mut().push(Event::Error {
                message: message.to_string(),
                cause: cause.to_string(),
            });
        }
    }
}
