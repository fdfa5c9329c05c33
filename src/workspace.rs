//! Workspace operations for project-root discovery and wiki paths.

use std::path::{Path, PathBuf};

use crate::config::WikiConfig;
use crate::error::AppError;

/// Maximum number of parent directories inspected during root discovery.
const MAX_ASCENT: usize = 10;

/// A project workspace rooted at the directory holding the wiki tree.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: WikiConfig,
}

impl Workspace {
    /// Create a workspace for an explicit root directory.
    pub fn new(root: PathBuf, config: WikiConfig) -> Self {
        Self { root, config }
    }

    /// Discover the project root starting from the current directory.
    ///
    /// Walks upward looking for a `.zed` or `.git` directory. When no
    /// marker is found within [`MAX_ASCENT`] levels, the current directory
    /// is used and a warning is printed.
    pub fn discover() -> Result<Self, AppError> {
        let cwd = std::env::current_dir()?;
        let root = match find_project_root(&cwd) {
            Some(root) => root,
            None => {
                println!("[WARN] Cannot find project root marker (.zed or .git). Using current directory.");
                cwd
            }
        };
        let config = WikiConfig::load(&root)?;
        Ok(Self { root, config })
    }

    /// The project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The active configuration.
    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Path to the wiki directory.
    pub fn wiki_dir(&self) -> PathBuf {
        self.root.join(&self.config.wiki_dir)
    }

    /// Path to the module documentation directory.
    pub fn modules_dir(&self) -> PathBuf {
        self.wiki_dir().join("modules")
    }

    /// Path to the directory holding persisted AI task batches.
    pub fn tasks_dir(&self) -> PathBuf {
        self.wiki_dir().join(".ai_tasks")
    }

    /// Path to the generated HTML site directory.
    pub fn site_dir(&self) -> PathBuf {
        self.wiki_dir().join("_site")
    }

    /// Check whether the wiki directory exists.
    pub fn wiki_exists(&self) -> bool {
        self.wiki_dir().is_dir()
    }
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    for _ in 0..MAX_ASCENT {
        if current.join(".zed").is_dir() || current.join(".git").is_dir() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
    None
}
