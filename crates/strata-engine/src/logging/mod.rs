//! Logging utilities.
//!
//! Logger initialization lives here so binaries and tests set up `env_logger`
//! the same way. Library code only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
