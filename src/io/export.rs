//! Dashboard JSON read/write.
//!
//! The JSON payload is the "portable" output of a dashboard run: the exact
//! shape the charting UI consumes (see `report::DashboardView`). Reading it
//! back is mostly useful for tests and downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::report::DashboardView;

/// Write a dashboard JSON file.
pub fn write_dashboard_json(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create dashboard JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, view)
        .map_err(|e| AppError::usage(format!("Failed to write dashboard JSON: {e}")))?;
    Ok(())
}

/// Read a dashboard JSON file.
pub fn read_dashboard_json(path: &Path) -> Result<DashboardView, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open dashboard JSON '{}': {e}", path.display()))
    })?;
    let view: DashboardView = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid dashboard JSON: {e}")))?;
    Ok(view)
}
