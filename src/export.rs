use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::BaselineSide;
use crate::reconcile::ComparisonRecord;
use crate::util::write_json_atomic;

const EXPORT_VERSION: u32 = 1;

/// Persisted structured form of one reconciliation pass. Reloading this
/// document and recomputing differences from the nested side views must
/// reproduce the original metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_version: u32,
    pub generated_at: String,
    /// Denominator convention used for the percentage figures.
    pub baseline: BaselineSide,
    pub comparisons: Vec<ComparisonRecord>,
}

pub fn build_export(
    records: &[ComparisonRecord],
    baseline: BaselineSide,
    generated_at: &str,
) -> ExportDocument {
    ExportDocument {
        export_version: EXPORT_VERSION,
        generated_at: generated_at.to_string(),
        baseline,
        comparisons: records.to_vec(),
    }
}

pub fn write_export(path: &Path, document: &ExportDocument) -> Result<()> {
    write_json_atomic(path, document)?;
    info!(
        path = %path.display(),
        comparisons = document.comparisons.len(),
        "wrote export"
    );
    Ok(())
}

pub fn load_export(path: &Path) -> Result<ExportDocument> {
    let raw =
        fs::read(path).with_context(|| format!("failed to read export: {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse export: {}", path.display()))
}
