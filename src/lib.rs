//! Cumulus - User, group and session management
//!
//! Command-line front end over `cumulus-core`: engine selection from flags
//! and environment, single-operation subcommands, and the demonstration run.

pub mod commands;
pub mod config;
pub mod demo;

/// Application name
pub const APP_NAME: &str = "cumulus";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
