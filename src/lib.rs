//! # scout
//!
//! Command-line front end for [`scout_search`]: argument parsing, TOML
//! configuration, platform directories and result rendering. The search
//! itself lives in the `scout-search` crate.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod scout_dirs;

pub use config::ScoutConfig;
pub use error::{Result, ScoutError};
