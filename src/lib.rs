//! Core library for the `httpstat` CLI.
//!
//! The binary polls one URL on a fixed interval and prints a row of timing
//! statistics per fetch. This crate holds the pieces it is built from: CLI
//! argument types, configuration loading, the sampler, the HTML resource
//! scanner, rolling statistics, and the row reporter.
pub mod args;
pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod probe;
pub mod report;
pub mod shutdown;

mod entry;
mod system;

pub use entry::run;
