use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, default_state_dir};

/// Route `tracing` output to `spindle.log`; the terminal belongs to the UI.
///
/// `SPINDLE_LOG` takes precedence over `log.level`. Returns the writer guard,
/// which must live until shutdown, or `None` when no log file could be set up.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let dir = settings.directory.clone().or_else(default_state_dir)?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("spindle: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("spindle")
        .filename_suffix("log")
        .build(&dir)
    {
        Ok(a) => a,
        Err(e) => {
            eprintln!("spindle: cannot open log file in {}: {e}", dir.display());
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("SPINDLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
