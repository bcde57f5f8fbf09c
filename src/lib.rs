//! Pick a host from your SSH client config and connect to it.
//!
//! Loading is a pure function of the config paths and the home directory:
//! [`HostSet::load`] parses every file, follows `Include` directives found in
//! `Host *` blocks and merges hosts that point at the same hostname. The
//! interactive part is [`App`], a state machine driven by [`Action`]s.

pub mod app;
pub mod connection;
pub mod error;
pub mod event;
pub mod filter;
pub mod handler;
pub mod host;
pub mod ssh_config;
pub mod tui;
pub mod ui;

use std::path::PathBuf;

pub use app::{Action, App, Phase};
pub use error::ConfigError;
pub use filter::HostFilter;
pub use host::{Host, HostSet};

/// Resolve the user's home directory. Required before any `~/` path is read.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}
