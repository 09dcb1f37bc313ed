//! Logging init: file under the XDG state dir, or graceful fallback to stderr.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Per-log-line writer: the cloned log file, or stderr when cloning fails.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,prowl=debug"))
}

/// Initialize structured logging to `~/.local/state/prowl/prowl.log`.
///
/// Returns Err when the state dir is unusable so the embedding process can
/// fall back to [`init_stderr_logging`] instead of crashing.
pub fn init_file_logging() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("prowl")
        .map_err(|e| Error::Configuration(format!("cannot resolve XDG base directories: {e}")))?;
    let log_dir = xdg_dirs.get_state_home().join("prowl");
    fs::create_dir_all(&log_dir).map_err(|source| Error::Read {
        path: log_dir.clone(),
        source,
    })?;

    let log_path = log_dir.join("prowl.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| Error::Read {
            path: log_path.clone(),
            source,
        })?;

    let writer = BoxMakeWriter::new(move || {
        file.try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("prowl logging initialized at {}", log_path.display());
    Ok(log_path)
}

/// Initialize logging to stderr only. Use when [`init_file_logging`] fails or
/// when the embedding engine owns log routing.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
