//! Persistence of task batches as JSON documents.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::task::FillTask;

/// One persisted, timestamped collection of fill tasks.
///
/// `generated_at` and `total_tasks` are informational; loading tolerates
/// their absence but a batch without a `tasks` key is structurally
/// malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskBatch {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub total_tasks: usize,
    pub tasks: Vec<FillTask>,
}

impl TaskBatch {
    /// Wrap a task list in a freshly timestamped batch.
    pub fn new(tasks: Vec<FillTask>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            total_tasks: tasks.len(),
            tasks,
        }
    }
}

/// Persist a task list as a new batch, creating parent directories as
/// needed. Content is UTF-8 with non-ASCII characters left unescaped.
pub fn save_tasks(tasks: Vec<FillTask>, path: &Path) -> Result<(), AppError> {
    save_batch(&TaskBatch::new(tasks), path)
}

/// Write an existing batch back to disk.
pub fn save_batch(batch: &TaskBatch, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(batch).map_err(|err| AppError::MalformedTaskFile {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a persisted batch.
///
/// Fails with a structural error when the file is missing, is not valid
/// JSON, lacks the top-level `tasks` key, or contains a task record
/// missing a required identity field. Optional per-task keys take their
/// documented defaults.
pub fn load_batch(path: &Path) -> Result<TaskBatch, AppError> {
    if !path.exists() {
        return Err(AppError::TaskFileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| AppError::MalformedTaskFile {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}
