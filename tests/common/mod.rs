//! Shared testing utilities for projwiki CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated project tree for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated project directory with a `.git` root marker.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        fs::create_dir_all(work_dir.join(".git")).expect("Failed to create root marker");

        Self { root, work_dir }
    }

    /// Path to the project directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `projwiki` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("projwiki").expect("Failed to locate projwiki binary");
        cmd.current_dir(&self.work_dir);
        cmd
    }

    /// Path to the wiki directory.
    pub fn wiki_dir(&self) -> PathBuf {
        self.work_dir.join(".zed").join(".projwiki")
    }

    /// Path to the module documentation directory.
    pub fn modules_dir(&self) -> PathBuf {
        self.wiki_dir().join("modules")
    }

    /// Path to the persisted task batch directory.
    pub fn tasks_dir(&self) -> PathBuf {
        self.wiki_dir().join(".ai_tasks")
    }

    /// Write a source file relative to the project root.
    pub fn write_source(&self, rel: &str, content: &str) {
        let path = self.work_dir.join(rel);
        fs::create_dir_all(path.parent().expect("source path should have a parent"))
            .expect("Failed to create source directory");
        fs::write(path, content).expect("Failed to write source file");
    }

    /// The most recent persisted task batch created by a scaffold run.
    pub fn pending_task_file(&self) -> PathBuf {
        let mut batches: Vec<PathBuf> = fs::read_dir(self.tasks_dir())
            .expect("task directory should exist")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("pending_tasks_") && n.ends_with(".json"))
            })
            .collect();
        batches.sort();
        batches.pop().expect("a pending task batch should exist")
    }
}
