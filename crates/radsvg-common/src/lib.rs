//! # RadSVG Common
//!
//! Logging configuration and setup shared by the radsvg crates.
//!
//! The library crates only emit events through `tracing`; hosts and tests decide whether
//! and how those events are collected by calling [`init_logging`].

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};
