// Conditional logging macros - only active in debug builds.
// Used for per-keystroke UI tracing that would be noise in release logs.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

pub enum LogTarget<'a> {
    Stderr,
    /// A new timestamped file in this directory; keeps the TUI screen clean.
    FileIn(&'a Path),
}

#[must_use]
pub fn log_file_name() -> String {
    format!("llm-hangman-{}.log", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Installs the global logger. `RUST_LOG` wins over `default_level`.
/// Returns the log file path when logging to a file.
pub fn init(target: LogTarget, default_level: &str) -> io::Result<Option<PathBuf>> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let path = match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
            None
        }
        LogTarget::FileIn(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name());
            let file = File::create(&path)?;
            builder.target(Target::Pipe(Box::new(file)));
            Some(path)
        }
    };

    if builder.try_init().is_err() {
        log::warn!("Logger already initialized");
    }
    Ok(path)
}
