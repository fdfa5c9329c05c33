//! Prompt assembly: renders one text block per task for an external AI
//! consumer, with optional source-derived context.

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::error::AppError;
use crate::source_info::SourceInfo;
use crate::task::{FillTask, Priority};

/// Truncation limits for the context subsections. Part of the observable
/// output contract.
const MAX_FUNCTIONS: usize = 20;
const MAX_INCLUDES: usize = 15;
const MAX_COMMENTS: usize = 5;

/// Strip the markdown list decoration a document's source reference
/// carries (`- `path`` style) before filesystem resolution.
fn clean_source_ref(raw: &str) -> &str {
    raw.trim().trim_start_matches(['-', ' ', '`']).trim_end_matches('`')
}

/// Resolved (decoration-stripped) source file names of a task.
pub fn resolved_source_files(task: &FillTask) -> Vec<String> {
    task.source_files.iter().map(|raw| clean_source_ref(raw).to_string()).collect()
}

/// Merge source info from every resolvable source file of a task, in list
/// order. Files that do not resolve under the project root contribute
/// nothing.
pub fn collect_source_info(task: &FillTask, project_root: &Path) -> SourceInfo {
    let mut merged = SourceInfo::default();
    for raw in &task.source_files {
        let path = project_root.join(clean_source_ref(raw));
        if path.exists() {
            merged.extend(SourceInfo::from_file(&path));
        }
    }
    merged
}

/// Whether source-derived context is attached when building this task's
/// prompt.
fn wants_source_context(task: &FillTask) -> bool {
    matches!(task.context_type.as_str(), "source_analysis" | "both")
}

/// Render the prompt block for one task.
///
/// Section order and the 20/15/5 truncation limits are fixed; empty
/// context subsections are omitted entirely.
pub fn render_task_prompt(task: &FillTask, info: &SourceInfo) -> String {
    let rule = "=".repeat(80);
    let frame = "-".repeat(40);
    let format_hint = if task.format_hint.is_empty() {
        "No special format requirements"
    } else {
        task.format_hint.as_str()
    };

    let mut prompt = format!(
        "{rule}\nAI fill task #{id}\n{rule}\n\n\
         [Task]\n\
         - Document: {file}\n\
         - Module: {module}\n\
         - Identifier: {ident}\n\
         - Type: {ty}\n\
         - Priority: {prio}\n\
         - Location: lines {start}-{end}\n\n\
         [Requirement]\n{req}\n\n\
         [Format]\n{format_hint}\n\n\
         [Current placeholder]\n{frame}\n{placeholder}\n{frame}\n\n",
        rule = rule,
        id = task.task_id,
        file = task.file_path,
        module = task.module_name,
        ident = task.identifier,
        ty = task.task_type,
        prio = task.priority,
        start = task.start_line,
        end = task.end_line,
        req = task.requirement,
        format_hint = format_hint,
        frame = frame,
        placeholder = task.placeholder_content,
    );

    if wants_source_context(task) {
        prompt.push_str("[Source analysis context]\n");
        prompt.push_str(&format!("Source files: {}\n\n", resolved_source_files(task).join(", ")));

        if !info.functions.is_empty() {
            prompt.push_str("## Functions\n");
            for func in info.functions.iter().take(MAX_FUNCTIONS) {
                prompt.push_str(&format!(
                    "- {} {}({})\n",
                    func.return_type, func.name, func.params
                ));
            }
            prompt.push('\n');
        }

        if !info.structs.is_empty() {
            prompt.push_str("## Structs\n");
            for def in &info.structs {
                prompt.push_str(&format!("### {}\n```c\n{}\n```\n\n", def.name, def.body));
            }
        }

        if !info.enums.is_empty() {
            prompt.push_str("## Enums\n");
            for def in &info.enums {
                prompt.push_str(&format!("### {}\n```c\n{}\n```\n\n", def.name, def.body));
            }
        }

        if !info.includes.is_empty() {
            prompt.push_str("## Includes\n");
            for include in info.includes.iter().take(MAX_INCLUDES) {
                prompt.push_str(&format!("- {}\n", include));
            }
            prompt.push('\n');
        }

        if !info.comments.is_empty() {
            prompt.push_str("## Key comments\n");
            for comment in info.comments.iter().take(MAX_COMMENTS) {
                prompt.push_str(&format!("```\n{}\n```\n\n", comment));
            }
        }
    }

    prompt.push_str(&format!(
        "\n{rule}\n[Generate the replacement content based on the information above]\n{rule}\n\n",
    ));

    prompt
}

/// Order tasks high, then medium, then low, keeping the original relative
/// order within each tier.
pub fn order_by_priority(tasks: &[FillTask]) -> Vec<&FillTask> {
    Priority::ORDERED
        .iter()
        .flat_map(|tier| tasks.iter().filter(move |task| task.priority == *tier))
        .collect()
}

/// Build a prompt for one task, gathering its source context on demand.
pub fn build_prompt(task: &FillTask, project_root: &Path) -> String {
    let info = collect_source_info(task, project_root);
    render_task_prompt(task, &info)
}

/// Write the batch prompt file: a generation header followed by one
/// rendered block per task, ordered by priority tier.
pub fn write_prompt_file(
    tasks: &[FillTask],
    output_path: &Path,
    project_root: &Path,
) -> Result<(), AppError> {
    let ordered = order_by_priority(tasks);

    let mut out = format!(
        "# AI fill task prompts\n\nGenerated: {}\nTotal tasks: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        ordered.len(),
    );

    for (idx, task) in ordered.iter().enumerate() {
        out.push_str(&format!("\n\n## Task {}/{}\n\n", idx + 1, ordered.len()));
        out.push_str(&build_prompt(task, project_root));
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, out)?;
    Ok(())
}
