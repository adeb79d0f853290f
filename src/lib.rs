//! weightlog - Weight and calorie log with crash-safe cloud-folder sync
//!
//! This crate provides the core functionality for the `wl` CLI tool.
//!
//! # Architecture
//!
//! - [`model`] - The `Record` type and its line format
//! - [`storage`] - Flat-file record store
//! - [`sync`] - Snapshot export/import through a cloud-drive folder
//! - [`analysis`] - Trend line and averages
//! - [`config`] - Configuration management
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};

/// Global quiet flag for `-q`.
///
/// When set, mutate commands skip their confirmation line. Avoids
/// threading a `quiet` bool through every handler signature.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
