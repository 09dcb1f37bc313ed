//! Crate-wide error taxonomy.
//!
//! Transport failures are deliberately absent: they are never raised by this
//! crate but carried through [`crate::request::Dispatch`] for the engine to
//! handle.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing startup configuration. Fatal; the process should
    /// not proceed with a half-configured middleware.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("proxy list {path} contains no usable entries")]
    EmptyProxyList { path: PathBuf },

    #[error("malformed proxy url `{url}`: {reason}")]
    MalformedProxyUrl { url: String, reason: String },

    /// Every proxy has been evicted. Expected during operation; callers fall
    /// back to direct (no-proxy) dispatch.
    #[error("proxy pool exhausted, no valid proxies remain")]
    PoolExhausted,
}
