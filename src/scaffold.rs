//! Document scaffolding: scan the source tree for modules and generate
//! missing documentation stubs, optionally harvesting AI fill tasks.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use minijinja::{Environment, UndefinedBehavior, context};

use crate::assets;
use crate::error::AppError;
use crate::markers::extract_fill_markers;
use crate::store::save_tasks;
use crate::task::{FillTask, tasks_from_markers};
use crate::workspace::Workspace;

/// Source files of one module, grouped by extension.
#[derive(Debug, Clone, Default)]
pub struct ModuleSources {
    pub c_files: Vec<PathBuf>,
    pub h_files: Vec<PathBuf>,
}

impl ModuleSources {
    /// Header-only modules with a single file are usually shared
    /// definition headers, not modules worth documenting.
    fn is_header_only_stub(&self) -> bool {
        self.c_files.is_empty() && self.h_files.len() == 1
    }
}

/// Result of a scaffold run.
#[derive(Debug)]
pub struct ScaffoldOutcome {
    pub created: usize,
    pub skipped: usize,
    pub tasks: Vec<FillTask>,
    /// Path of the persisted task batch, when AI fill was requested and
    /// at least one task was harvested.
    pub task_file: Option<PathBuf>,
}

/// Scan the project tree and group `.c`/`.h` files into modules by stem.
pub fn scan_sources(workspace: &Workspace) -> Result<BTreeMap<String, ModuleSources>, AppError> {
    let mut modules = BTreeMap::new();
    walk_sources(workspace, workspace.root(), &mut modules)?;
    Ok(modules)
}

fn walk_sources(
    workspace: &Workspace,
    dir: &Path,
    modules: &mut BTreeMap<String, ModuleSources>,
) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };

        if path.is_dir() {
            if !workspace.config().is_ignored(&name) {
                walk_sources(workspace, &path, modules)?;
            }
            continue;
        }

        if let Some(stem) = name.strip_suffix(".c") {
            modules.entry(stem.to_string()).or_default().c_files.push(path);
        } else if let Some(stem) = name.strip_suffix(".h") {
            modules.entry(stem.to_string()).or_default().h_files.push(path);
        }
    }
    Ok(())
}

/// Infer the architectural layer of a module from its name.
pub fn infer_layer(module_name: &str) -> &'static str {
    let lower = module_name.to_lowercase();
    if ["bsp", "driver", "hal", "hw"].iter().any(|k| lower.contains(k)) {
        "Hardware"
    } else if ["mid", "os", "sys"].iter().any(|k| lower.contains(k)) {
        "Middleware"
    } else if ["calc", "alg", "math"].iter().any(|k| lower.contains(k)) {
        "Calculation"
    } else {
        "Application"
    }
}

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Render a document template with strict interpolation-only semantics.
fn render_doc_template(
    template_name: &str,
    template: &str,
    module_name: &str,
    layer: &str,
    source_list: &str,
) -> Result<String, AppError> {
    let env = TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    });

    env.render_str(
        template,
        context! {
            module_name => module_name,
            layer => layer,
            date => Local::now().format("%Y-%m-%d").to_string(),
            source_files => source_list,
        },
    )
    .map_err(|err| AppError::TemplateRenderError {
        template: template_name.to_string(),
        reason: err.to_string(),
    })
}

/// Render the markdown list of a module's source files, relative to the
/// project root with forward slashes, `.c` files first.
fn source_list(root: &Path, sources: &ModuleSources) -> String {
    let mut lines = Vec::new();
    for path in sources.c_files.iter().chain(sources.h_files.iter()) {
        let rel = path.strip_prefix(root).unwrap_or(path);
        lines.push(format!("- `{}`", rel.to_string_lossy().replace('\\', "/")));
    }
    lines.join("\n")
}

/// Run the scaffolder: generate one markdown stub per undocumented
/// module. Existing documents are never overwritten. With `ai_fill`, the
/// AI template is used and its rendered markers are harvested into a
/// fresh task batch under the workspace task directory.
pub fn run(workspace: &Workspace, ai_fill: bool) -> Result<ScaffoldOutcome, AppError> {
    let modules_dir = workspace.modules_dir();
    fs::create_dir_all(&modules_dir)?;

    let (template_name, template) = assets::doc_template(ai_fill)?;
    println!("[INFO] Using template: {}", template_name);

    println!("[INFO] Scanning sources in {}...", workspace.root().display());
    let modules = scan_sources(workspace)?;
    println!("[INFO] Found {} potential modules.", modules.len());

    let mut outcome =
        ScaffoldOutcome { created: 0, skipped: 0, tasks: Vec::new(), task_file: None };

    for (name, sources) in &modules {
        if sources.is_header_only_stub() {
            continue;
        }

        let doc_path = modules_dir.join(format!("{}.md", name));
        if doc_path.exists() {
            outcome.skipped += 1;
            continue;
        }

        let listing = source_list(workspace.root(), sources);
        let content =
            render_doc_template(template_name, template, name, infer_layer(name), &listing)?;
        fs::write(&doc_path, &content)?;
        println!("[NEW] Created {}.md", name);
        outcome.created += 1;

        if ai_fill {
            let regions = extract_fill_markers(&content);
            if !regions.is_empty() {
                let rel_doc = doc_path
                    .strip_prefix(workspace.root())
                    .unwrap_or(&doc_path)
                    .to_string_lossy()
                    .replace('\\', "/");
                let source_refs: Vec<String> =
                    listing.lines().map(|line| line.to_string()).collect();
                let tasks = tasks_from_markers(&regions, &rel_doc, name, &source_refs);
                println!("      └─ {} AI fill tasks", tasks.len());
                outcome.tasks.extend(tasks);
            }
        }
    }

    if ai_fill && !outcome.tasks.is_empty() {
        let task_file = workspace
            .tasks_dir()
            .join(format!("pending_tasks_{}.json", Local::now().format("%Y%m%d_%H%M%S")));
        save_tasks(outcome.tasks.clone(), &task_file)?;
        outcome.task_file = Some(task_file);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WikiConfig;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path().to_path_buf(), WikiConfig::default())
    }

    fn write_source(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn layer_inference_matches_name_fragments() {
        assert_eq!(infer_layer("uart_hal"), "Hardware");
        assert_eq!(infer_layer("bsp_clock"), "Hardware");
        assert_eq!(infer_layer("mid_can"), "Middleware");
        assert_eq!(infer_layer("sys_tick"), "Middleware");
        assert_eq!(infer_layer("fast_math"), "Calculation");
        assert_eq!(infer_layer("motor_app"), "Application");
    }

    #[test]
    fn scan_groups_files_by_stem_and_skips_ignored_dirs() {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_source(dir.path(), "App/motor.c", "");
        write_source(dir.path(), "App/motor.h", "");
        write_source(dir.path(), "App/util.c", "");
        write_source(dir.path(), "build/gen.c", "");
        write_source(dir.path(), "App/readme.txt", "");

        let modules = scan_sources(&workspace(&dir)).expect("scan should succeed");

        let names: HashSet<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(names, HashSet::from(["motor", "util"]));
        assert_eq!(modules["motor"].c_files.len(), 1);
        assert_eq!(modules["motor"].h_files.len(), 1);
    }

    #[test]
    fn scaffold_creates_docs_and_never_overwrites() {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_source(dir.path(), "App/motor.c", "void motor_init(void);\n");
        let ws = workspace(&dir);

        let first = run(&ws, false).expect("scaffold should succeed");
        assert_eq!(first.created, 1);
        assert_eq!(first.skipped, 0);

        let doc_path = ws.modules_dir().join("motor.md");
        fs::write(&doc_path, "edited by hand").unwrap();

        let second = run(&ws, false).expect("rerun should succeed");
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(fs::read_to_string(&doc_path).unwrap(), "edited by hand");
    }

    #[test]
    fn header_only_single_file_modules_are_skipped() {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_source(dir.path(), "App/defs.h", "#define N 1\n");
        write_source(dir.path(), "App/motor.c", "");
        let ws = workspace(&dir);

        let outcome = run(&ws, false).expect("scaffold should succeed");
        assert_eq!(outcome.created, 1);
        assert!(!ws.modules_dir().join("defs.md").exists());
    }

    #[test]
    fn rendered_doc_interpolates_template_variables() {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_source(dir.path(), "App/motor.c", "");
        let ws = workspace(&dir);

        run(&ws, false).expect("scaffold should succeed");

        let content = fs::read_to_string(ws.modules_dir().join("motor.md")).unwrap();
        assert!(content.contains("title: motor"));
        assert!(content.contains("layer: Application"));
        assert!(content.contains("- `App/motor.c`"));
        assert!(!content.contains("{{"));
    }

    #[test]
    fn ai_fill_harvests_tasks_and_persists_a_batch() {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_source(dir.path(), "App/motor.c", "void motor_init(void);\n");
        write_source(dir.path(), "Calc/foc.c", "");
        let ws = workspace(&dir);

        let outcome = run(&ws, true).expect("scaffold should succeed");

        assert_eq!(outcome.created, 2);
        // Three marker regions per generated document.
        assert_eq!(outcome.tasks.len(), 6);
        let task_file = outcome.task_file.expect("task batch should be saved");
        assert!(task_file.exists());

        let batch = crate::store::load_batch(&task_file).expect("batch should load");
        assert_eq!(batch.total_tasks, 6);
        assert!(batch.tasks.iter().any(|t| t.task_id == "motor_overview_000"));
        assert!(batch.tasks.iter().any(|t| t.task_id == "foc_usage_002"));
        let motor = batch.tasks.iter().find(|t| t.task_id == "motor_overview_000").unwrap();
        assert_eq!(motor.file_path, ".zed/.projwiki/modules/motor.md");
        assert_eq!(motor.source_files, vec!["- `App/motor.c`"]);
        assert!(motor.start_line > 0);
        assert!(motor.end_line >= motor.start_line);
    }
}
