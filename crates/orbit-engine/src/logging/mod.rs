//! Logging utilities.
//!
//! Centralizes logger initialization. Engine code logs through the `log`
//! facade only; `env_logger` is wired up here.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
