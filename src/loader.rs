use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::CompareError;
use crate::model::{InputDocument, RawScenarioResult};

/// One loaded dataset, keyed by scenario for reconciliation.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display label: the document's condition flag, or the file stem.
    pub label: String,
    /// Raw condition flag from the document, when present.
    pub condition: Option<String>,
    pub timestamp: Option<String>,
    pub results: BTreeMap<String, RawScenarioResult>,
}

impl Dataset {
    /// Empty side for single-dataset mode: contributes no keys.
    pub fn empty(label: &str) -> Self {
        Self {
            label: label.to_string(),
            condition: None,
            timestamp: None,
            results: BTreeMap::new(),
        }
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, CompareError> {
    if !path.exists() {
        return Err(CompareError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read(path).map_err(|err| CompareError::Io {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;

    let document: InputDocument =
        serde_json::from_slice(&raw).map_err(|err| CompareError::MalformedInput {
            path: path.to_path_buf(),
            detail: format!("invalid json: {err}"),
        })?;

    let mut results = BTreeMap::new();
    for (index, result) in document.results.into_iter().enumerate() {
        let Some(key) = result.scenario_key.clone() else {
            return Err(CompareError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("result at index {index} is missing scenario_key"),
            });
        };

        if results.insert(key.clone(), result).is_some() {
            return Err(CompareError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("duplicate scenario_key: {key}"),
            });
        }
    }

    let label = document
        .condition_flag
        .clone()
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| path.display().to_string());

    info!(
        path = %path.display(),
        label = %label,
        scenario_count = results.len(),
        "loaded dataset"
    );

    Ok(Dataset {
        label,
        condition: document.condition_flag,
        timestamp: document.timestamp,
        results,
    })
}
