//! Bulk path remapping for persisted task batches.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::store::TaskBatch;

/// An immutable old-path to new-path substitution table.
///
/// Loaded from a TOML file with a `[mapping]` table and passed explicitly
/// into [`PathMap::apply`]; there is no process-wide mapping state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    entries: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct MapFile {
    #[serde(default)]
    mapping: BTreeMap<String, String>,
}

impl PathMap {
    /// Build a map from explicit entries.
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a mapping file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::config_error(format!(
                "Path map file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let file: MapFile = toml::from_str(&content).map_err(|err| AppError::MalformedPathMap {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { entries: file.mapping })
    }

    /// Number of mapping entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite every task whose `file_path` appears in the table.
    /// Returns the number of rewritten tasks.
    pub fn apply(&self, batch: &mut TaskBatch) -> usize {
        let mut updated = 0;
        for task in &mut batch.tasks {
            if let Some(new_path) = self.entries.get(&task.file_path) {
                task.file_path = new_path.clone();
                updated += 1;
            }
        }
        updated
    }
}
