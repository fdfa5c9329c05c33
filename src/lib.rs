//! projwiki: documentation-maintenance toolkit for firmware source trees.
//!
//! Scans sources for modules, scaffolds markdown stubs, harvests AI fill
//! tasks into a persisted batch, assembles prompts for an external AI
//! consumer, checks doc/source staleness, and builds a self-contained
//! HTML viewer.

pub mod assets;
pub mod config;
pub mod error;
pub mod markers;
pub mod menu;
pub mod prompt;
pub mod remap;
pub mod scaffold;
pub mod site;
pub mod source_info;
pub mod staleness;
pub mod store;
pub mod task;
pub mod workspace;

use std::path::Path;

use chrono::Local;

pub use error::AppError;
pub use scaffold::ScaffoldOutcome;
pub use site::SiteOutcome;
pub use staleness::ModuleReport;

use workspace::Workspace;

/// Scaffold missing module documentation. With `ai_fill`, harvest marker
/// regions into a persisted task batch and print its summary.
pub fn scaffold(ai_fill: bool) -> Result<ScaffoldOutcome, AppError> {
    let workspace = Workspace::discover()?;
    let outcome = scaffold::run(&workspace, ai_fill)?;

    println!("{}", "-".repeat(40));
    println!("[SUMMARY] Created: {}, Skipped (existing): {}", outcome.created, outcome.skipped);

    if let Some(task_file) = &outcome.task_file {
        println!("\n[AI TASKS] Generated {} pending task(s)", outcome.tasks.len());
        println!("[AI TASKS] Task file: {}", task_file.display());
        println!("{}", task::summarize(&outcome.tasks));
        println!("[NEXT] Run 'projwiki complete {}' to work through them.", task_file.display());
    }
    println!("[NEXT] Run 'projwiki build' to refresh the HTML viewer.");

    Ok(outcome)
}

/// Load a task batch and either generate the prompt file directly or run
/// the interactive menu.
pub fn complete(
    task_file: &Path,
    generate_prompts: bool,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let workspace = Workspace::discover()?;

    println!("[INFO] Loading task file: {}", task_file.display());
    let batch = store::load_batch(task_file)?;

    if batch.tasks.is_empty() {
        println!("[WARN] No pending tasks found");
        return Ok(());
    }
    println!("[INFO] Found {} task(s)", batch.tasks.len());

    if generate_prompts {
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => task_file
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("ai_prompts_{}.md", Local::now().format("%Y%m%d_%H%M%S"))),
        };

        println!("[INFO] Generating prompt file: {}", output.display());
        prompt::write_prompt_file(&batch.tasks, &output, workspace.root())?;
        println!("✅ Prompt file generated");
        println!("\nHand this file to the AI assistant:");
        println!("  {}", output.display());
        Ok(())
    } else {
        menu::run(&batch.tasks, workspace.root(), task_file)
    }
}

/// Report documentation freshness for every documented module.
pub fn check() -> Result<Vec<ModuleReport>, AppError> {
    let workspace = Workspace::discover()?;

    if !workspace.wiki_exists() {
        return Err(AppError::WikiNotFound(workspace.wiki_dir().display().to_string()));
    }

    println!("[INFO] Checking documentation freshness in {}...", workspace.root().display());

    let reports = staleness::check(&workspace)?;
    if reports.is_empty() {
        println!("[WARN] No module documentation found.");
        return Ok(reports);
    }

    staleness::print_report(&workspace, &reports);
    Ok(reports)
}

/// Build the self-contained HTML viewer for the wiki.
pub fn build_site(project: Option<&str>) -> Result<SiteOutcome, AppError> {
    let workspace = Workspace::discover()?;

    if !workspace.wiki_exists() {
        return Err(AppError::WikiNotFound(workspace.wiki_dir().display().to_string()));
    }

    println!("[INFO] Project root : {}", workspace.root().display());
    println!("[INFO] Wiki directory: {}", workspace.wiki_dir().display());

    let project_name = project.unwrap_or(&workspace.config().project_name).to_string();
    let outcome = site::build(&workspace, &project_name)?;

    let size_kb = std::fs::metadata(&outcome.output_path)?.len() as f64 / 1024.0;
    println!("\n✅ Generated {}", outcome.output_path.display());
    println!("[OK] File size: {:.1} KB", size_kb);
    println!("[OK] Open it in a browser to view the documentation");

    Ok(outcome)
}

/// Rewrite task file paths in a persisted batch using an explicit
/// mapping file. Returns the number of rewritten tasks.
pub fn remap(task_file: &Path, map_file: &Path) -> Result<usize, AppError> {
    let map = remap::PathMap::load(map_file)?;
    let mut batch = store::load_batch(task_file)?;

    let updated = map.apply(&mut batch);
    store::save_batch(&batch, task_file)?;

    println!("[OK] Updated {} task path(s)", updated);
    Ok(updated)
}
