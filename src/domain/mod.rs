//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the tracked metals (`Metal`) and their model constants
//! - canonical ingested rows (`Observation`)
//! - derived curve structures (`Curve`, `TenorPoint`)
//! - macro scalar snapshots (`MacroSnapshot`, `MacroDeltas`)

pub mod types;

pub use types::*;
