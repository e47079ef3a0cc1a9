//! `metals-curves` library crate.
//!
//! The binary (`metals`) is a thin wrapper around this library so that:
//!
//! - the derivation engine is testable without spawning processes
//! - modules are reusable (e.g., a future HTTP daemon or notebook use)
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
