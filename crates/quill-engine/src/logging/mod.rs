//! Logging setup.
//!
//! The engine itself only emits through the `log` facade; this module wires
//! `env_logger` up for binaries and tests.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
