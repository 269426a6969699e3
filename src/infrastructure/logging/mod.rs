//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Installed before resolution, then switched to the validated `Main.loglevel`
//! - JSON or pretty formatting on stderr
//! - Optional rolling log files

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
