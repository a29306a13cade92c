//! Case data: model, search/dashboard views, and the workbench that owns
//! the loaded list and the current selection.

pub mod model;
pub mod search;
pub mod workbench;

pub use model::*;
pub use search::{DashboardFilter, DashboardStats, filter_cases, search};
pub use workbench::{Selection, Workbench};

use std::path::Path;

use crate::error::WorkbenchError;

const DEMO_CASES: &str = include_str!("../../data/demo_cases.json");

/// Parse a JSON array of case records.
pub fn parse_cases(json: &str) -> Result<Vec<Case>, WorkbenchError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON array of case records from disk.
pub fn load_cases(path: &Path) -> Result<Vec<Case>, WorkbenchError> {
    let json = std::fs::read_to_string(path).map_err(|source| WorkbenchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cases = parse_cases(&json)?;
    tracing::info!(path = %path.display(), count = cases.len(), "Loaded cases");
    Ok(cases)
}

/// The three bundled demo cases.
pub fn demo_cases() -> Vec<Case> {
    // Bundled at compile time and covered by tests.
    parse_cases(DEMO_CASES).unwrap_or_default()
}
