//! Input/output helpers.
//!
//! - CSV feed ingest + validation (`ingest`)
//! - dashboard JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
