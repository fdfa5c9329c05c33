//! Documentation freshness checking by modification-time comparison.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::AppError;
use crate::workspace::Workspace;

/// Freshness verdict for one documented module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Documentation is at least as new as every source file.
    Fresh,
    /// A source file was modified strictly after the documentation.
    Outdated,
    /// No `.c`/`.h` file with the module's name exists.
    MissingSrc,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Freshness::Fresh => "Fresh",
            Freshness::Outdated => "OUTDATED",
            Freshness::MissingSrc => "Missing Src",
        };
        write!(f, "{}", label)
    }
}

/// Freshness of one module document.
#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub module: String,
    pub doc_path: PathBuf,
    pub doc_mtime: SystemTime,
    pub src_mtime: Option<SystemTime>,
    pub freshness: Freshness,
}

/// Classify a document against the newest associated source mtime.
pub fn classify(doc_mtime: SystemTime, src_mtime: Option<SystemTime>) -> Freshness {
    match src_mtime {
        None => Freshness::MissingSrc,
        Some(src) if src > doc_mtime => Freshness::Outdated,
        Some(_) => Freshness::Fresh,
    }
}

/// Newest modification time among `{module}.c` / `{module}.h` files under
/// the project root, honoring the configured ignore directories.
pub fn newest_source_mtime(
    workspace: &Workspace,
    module: &str,
) -> Result<Option<SystemTime>, AppError> {
    let c_name = format!("{}.c", module);
    let h_name = format!("{}.h", module);
    let mut newest = None;
    walk_for_sources(workspace, workspace.root(), &c_name, &h_name, &mut newest)?;
    Ok(newest)
}

fn walk_for_sources(
    workspace: &Workspace,
    dir: &Path,
    c_name: &str,
    h_name: &str,
    newest: &mut Option<SystemTime>,
) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };

        if path.is_dir() {
            if !workspace.config().is_ignored(&name) {
                walk_for_sources(workspace, &path, c_name, h_name, newest)?;
            }
        } else if name == c_name || name == h_name {
            let mtime = entry.metadata()?.modified()?;
            if newest.map(|current| mtime > current).unwrap_or(true) {
                *newest = Some(mtime);
            }
        }
    }
    Ok(())
}

/// Check every module document under the wiki against its sources.
pub fn check(workspace: &Workspace) -> Result<Vec<ModuleReport>, AppError> {
    let mut docs = Vec::new();
    collect_docs(&workspace.modules_dir(), &mut docs)?;
    docs.sort();

    let mut reports = Vec::new();
    for doc_path in docs {
        let Some(module) = doc_path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
            continue;
        };
        let doc_mtime = fs::metadata(&doc_path)?.modified()?;
        let src_mtime = newest_source_mtime(workspace, &module)?;

        reports.push(ModuleReport {
            freshness: classify(doc_mtime, src_mtime),
            module,
            doc_path,
            doc_mtime,
            src_mtime,
        });
    }

    Ok(reports)
}

fn collect_docs(dir: &Path, docs: &mut Vec<PathBuf>) -> Result<(), AppError> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_docs(&path, docs)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            docs.push(path);
        }
    }
    Ok(())
}

fn format_mtime(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print the freshness table and the outdated summary.
pub fn print_report(workspace: &Workspace, reports: &[ModuleReport]) {
    println!(
        "{:<20} | {:<11} | {:<19} | {:<19}",
        "Module", "Status", "Last Doc Update", "Last Source Update"
    );
    println!("{}", "-".repeat(76));

    for report in reports {
        let src_time = report.src_mtime.map(format_mtime).unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<20} | {:<11} | {:<19} | {:<19}",
            report.module,
            report.freshness.to_string(),
            format_mtime(report.doc_mtime),
            src_time,
        );
    }

    println!("{}", "-".repeat(76));

    let outdated: Vec<&ModuleReport> =
        reports.iter().filter(|r| r.freshness == Freshness::Outdated).collect();

    if outdated.is_empty() {
        println!("\n[OK] All documentation is up to date!");
        return;
    }

    println!("\n[ATTENTION] Found {} outdated documents:", outdated.len());
    println!("{:<20} | {:<40}", "Module", "Doc Path");
    println!("{}", "-".repeat(65));
    for report in outdated {
        let rel = report
            .doc_path
            .strip_prefix(workspace.root())
            .unwrap_or(&report.doc_path)
            .to_string_lossy()
            .replace('\\', "/");
        println!("{:<20} | {:<40}", report.module, rel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WikiConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path().to_path_buf(), WikiConfig::default())
    }

    #[test]
    fn classify_follows_strictly_newer_rule() {
        let doc = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let older = SystemTime::UNIX_EPOCH + Duration::from_secs(900);
        let newer = SystemTime::UNIX_EPOCH + Duration::from_secs(1_100);

        assert_eq!(classify(doc, None), Freshness::MissingSrc);
        assert_eq!(classify(doc, Some(older)), Freshness::Fresh);
        assert_eq!(classify(doc, Some(doc)), Freshness::Fresh);
        assert_eq!(classify(doc, Some(newer)), Freshness::Outdated);
    }

    #[test]
    fn newest_mtime_picks_latest_matching_file() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let ws = workspace(&dir);
        fs::create_dir_all(dir.path().join("App")).unwrap();
        fs::write(dir.path().join("App/motor.c"), "a").unwrap();
        fs::write(dir.path().join("App/motor.h"), "b").unwrap();
        fs::write(dir.path().join("App/other.c"), "c").unwrap();

        let newest = newest_source_mtime(&ws, "motor").expect("walk should succeed");
        assert!(newest.is_some());

        let missing = newest_source_mtime(&ws, "ghost").expect("walk should succeed");
        assert!(missing.is_none());
    }

    #[test]
    fn ignored_directories_do_not_contribute_sources() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let ws = workspace(&dir);
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build/motor.c"), "generated").unwrap();

        let newest = newest_source_mtime(&ws, "motor").expect("walk should succeed");
        assert!(newest.is_none());
    }

    #[test]
    fn check_reports_every_documented_module() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let ws = workspace(&dir);
        fs::create_dir_all(ws.modules_dir().join("application")).unwrap();
        fs::create_dir_all(dir.path().join("App")).unwrap();

        fs::write(dir.path().join("App/motor.c"), "src").unwrap();
        fs::write(ws.modules_dir().join("application/motor.md"), "doc").unwrap();
        fs::write(ws.modules_dir().join("ghost.md"), "doc").unwrap();

        let reports = check(&ws).expect("check should succeed");
        assert_eq!(reports.len(), 2);

        let ghost = reports.iter().find(|r| r.module == "ghost").unwrap();
        assert_eq!(ghost.freshness, Freshness::MissingSrc);

        let motor = reports.iter().find(|r| r.module == "motor").unwrap();
        // The doc was written after the source in this test.
        assert_ne!(motor.freshness, Freshness::MissingSrc);
    }

    #[test]
    fn source_written_after_doc_is_outdated() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let ws = workspace(&dir);
        fs::create_dir_all(ws.modules_dir()).unwrap();
        fs::create_dir_all(dir.path().join("App")).unwrap();

        fs::write(ws.modules_dir().join("motor.md"), "doc").unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        fs::write(dir.path().join("App/motor.c"), "newer source").unwrap();

        let reports = check(&ws).expect("check should succeed");
        assert_eq!(reports[0].freshness, Freshness::Outdated);
    }
}
