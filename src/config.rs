//! Project-level configuration loaded from `.projwiki.toml`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = ".projwiki.toml";

/// Configuration for scanning and site generation.
///
/// Every field has a default mirroring the conventional firmware tree
/// layout, so a missing config file is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Project name injected into the generated HTML viewer.
    pub project_name: String,
    /// Wiki directory, relative to the project root.
    pub wiki_dir: String,
    /// Directory names skipped during source scans.
    pub ignore_dirs: Vec<String>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            project_name: "Firmware".to_string(),
            wiki_dir: ".zed/.projwiki".to_string(),
            ignore_dirs: [
                ".git",
                ".zed",
                ".vscode",
                ".idea",
                "build",
                "dist",
                "node_modules",
                "venv",
                "__pycache__",
                "Firmware",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl WikiConfig {
    /// Load configuration from `<root>/.projwiki.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self, AppError> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|err| {
            AppError::config_error(format!("Invalid {}: {}", CONFIG_FILE, err))
        })
    }

    /// Whether a directory name is excluded from source scans.
    pub fn is_ignored(&self, dir_name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == dir_name)
    }
}
