//! Logging utilities.
//!
//! The engine logs through the `log` facade only. This module offers an
//! `env_logger` setup for binaries and tests that want output.

mod init;

pub use init::{LoggingConfig, init_logging};
