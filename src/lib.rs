pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod pool;
pub mod request;
pub mod retry;

pub use config::ProwlConfig;
pub use error::{Error, Result};
