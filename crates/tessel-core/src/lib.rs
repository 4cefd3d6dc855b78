//! Tessel Core
//!
//! Shared plumbing for the Tessel element engine: logging bootstrap,
//! configuration and the hash collections used across the workspace.

pub mod alloc;
pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
