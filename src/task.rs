//! The AI fill task model and its persisted form.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::markers::MarkerRegion;

/// Task priority tier. Unknown marker metadata falls back to `medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All tiers in rendering order.
    pub const ORDERED: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    fn from_metadata(value: &str) -> Self {
        match value {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", name)
    }
}

/// Task lifecycle state. Nothing currently transitions a task to
/// `completed`; documents are edited directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

/// One unit of required content generation, extracted from a marker
/// region of a documentation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillTask {
    /// Unique id within a batch: `{module}_{identifier}_{ordinal:03}`.
    pub task_id: String,
    /// Document containing the marker, relative to the project root.
    pub file_path: String,
    /// Marker identifier token.
    pub identifier: String,
    /// Free-form task type from marker metadata.
    pub task_type: String,
    pub priority: Priority,
    /// Free text instructing what to generate.
    pub requirement: String,
    /// Governs whether source-derived context is attached to the prompt.
    pub context_type: String,
    #[serde(default)]
    pub format_hint: String,
    /// 1-based line of the start delimiter at extraction time.
    #[serde(default)]
    pub start_line: usize,
    /// 1-based line of the end delimiter at extraction time.
    #[serde(default)]
    pub end_line: usize,
    /// Trimmed text currently between the markers.
    #[serde(default)]
    pub placeholder_content: String,
    /// Source file references as written in the document, not yet
    /// stripped of markdown list decoration.
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default = "timestamp_now")]
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

/// Build tasks from a document's extracted marker regions.
///
/// The ordinal in each task id is the marker's zero-based position within
/// this document's marker list, so two documents sharing an identifier
/// still produce distinct ids as long as their module names differ.
pub fn tasks_from_markers(
    regions: &[MarkerRegion],
    file_path: &str,
    module_name: &str,
    source_files: &[String],
) -> Vec<FillTask> {
    regions
        .iter()
        .enumerate()
        .map(|(ordinal, region)| FillTask {
            task_id: format!("{}_{}_{:03}", module_name, region.identifier, ordinal),
            file_path: file_path.to_string(),
            identifier: region.identifier.clone(),
            task_type: region.metadata.get_or("Type", "unknown").to_string(),
            priority: Priority::from_metadata(region.metadata.get_or("Priority", "medium")),
            requirement: region.metadata.get_or("Requirement", "").to_string(),
            context_type: region.metadata.get_or("Context", "source_analysis").to_string(),
            format_hint: region.metadata.get_or("Format", "").to_string(),
            start_line: region.start_line,
            end_line: region.end_line,
            placeholder_content: region.placeholder.trim().to_string(),
            source_files: source_files.to_vec(),
            module_name: module_name.to_string(),
            status: Status::Pending,
            created_at: timestamp_now(),
            completed_at: None,
            ai_response: None,
        })
        .collect()
}

/// Render the operator-facing summary report for a freshly generated
/// batch: totals, per-priority and per-type breakdowns, and the task list.
pub fn summarize(tasks: &[FillTask]) -> String {
    let mut by_priority: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();

    for task in tasks {
        let tier = match task.priority {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        *by_priority.entry(tier).or_default() += 1;
        *by_type.entry(task.task_type.as_str()).or_default() += 1;
    }

    let mut report = format!(
        "\nAI fill task summary\n{}\nTotal tasks: {}\n\nBy priority:\n  - high:   {}\n  - medium: {}\n  - low:    {}\n\nBy type:\n",
        "=".repeat(60),
        tasks.len(),
        by_priority.get("high").copied().unwrap_or(0),
        by_priority.get("medium").copied().unwrap_or(0),
        by_priority.get("low").copied().unwrap_or(0),
    );

    for (task_type, count) in &by_type {
        report.push_str(&format!("  - {}: {}\n", task_type, count));
    }

    report.push_str("\nTask list:\n");
    report.push_str(&"-".repeat(60));
    report.push('\n');

    for task in tasks {
        let requirement: String = task.requirement.chars().take(80).collect();
        report.push_str(&format!(
            "[{}] {}\n  File: {}\n  Type: {}\n  Requirement: {}...\n\n",
            task.priority.to_string().to_uppercase(),
            task.task_id,
            task.file_path,
            task.task_type,
            requirement,
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::extract_fill_markers;
    use std::collections::HashSet;

    fn sample_doc(identifier: &str, priority: &str) -> String {
        format!(
            "<!-- AI_FILL_START:{identifier}\nType: description\nPriority: {priority}\nRequirement: Fill it in\nContext: both\nFormat: bullet list\n-->\n  draft text  \n<!-- AI_FILL_END:{identifier} -->\n",
        )
    }

    #[test]
    fn task_fields_come_from_metadata() {
        let doc = sample_doc("overview", "high");
        let regions = extract_fill_markers(&doc);
        let tasks = tasks_from_markers(&regions, "wiki/uart.md", "uart", &[]);

        let task = &tasks[0];
        assert_eq!(task.task_id, "uart_overview_000");
        assert_eq!(task.task_type, "description");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.requirement, "Fill it in");
        assert_eq!(task.context_type, "both");
        assert_eq!(task.format_hint, "bullet list");
        assert_eq!(task.placeholder_content, "draft text");
        assert_eq!(task.status, Status::Pending);
        assert!(task.completed_at.is_none());
        assert!(task.ai_response.is_none());
    }

    #[test]
    fn missing_metadata_keys_take_defaults() {
        let doc = "<!-- AI_FILL_START:bare\nType: description\n-->\nx\n<!-- AI_FILL_END:bare -->\n";
        let regions = extract_fill_markers(doc);
        let tasks = tasks_from_markers(&regions, "wiki/m.md", "m", &[]);

        let task = &tasks[0];
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.requirement, "");
        assert_eq!(task.context_type, "source_analysis");
        assert_eq!(task.format_hint, "");
    }

    #[test]
    fn unknown_priority_coerces_to_medium() {
        assert_eq!(Priority::from_metadata("urgent"), Priority::Medium);
        assert_eq!(Priority::from_metadata("high"), Priority::High);
        assert_eq!(Priority::from_metadata("low"), Priority::Low);
    }

    #[test]
    fn ordinals_make_ids_unique_within_document() {
        let doc = format!("{}{}", sample_doc("part", "low"), sample_doc("part", "low"));
        let regions = extract_fill_markers(&doc);
        let tasks = tasks_from_markers(&regions, "wiki/m.md", "m", &[]);

        assert_eq!(tasks[0].task_id, "m_part_000");
        assert_eq!(tasks[1].task_id, "m_part_001");
    }

    #[test]
    fn shared_identifiers_stay_unique_across_modules() {
        let doc = sample_doc("overview", "medium");
        let regions = extract_fill_markers(&doc);

        let mut batch = tasks_from_markers(&regions, "wiki/spi.md", "spi", &[]);
        batch.extend(tasks_from_markers(&regions, "wiki/i2c.md", "i2c", &[]));

        let ids: HashSet<&str> = batch.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids.len(), batch.len());
    }

    #[test]
    fn summary_counts_priorities_and_types() {
        let doc = format!("{}{}", sample_doc("a", "high"), sample_doc("b", "low"));
        let regions = extract_fill_markers(&doc);
        let tasks = tasks_from_markers(&regions, "wiki/m.md", "m", &[]);

        let report = summarize(&tasks);
        assert!(report.contains("Total tasks: 2"));
        assert!(report.contains("- high:   1"));
        assert!(report.contains("- low:    1"));
        assert!(report.contains("- description: 2"));
        assert!(report.contains("[HIGH] m_a_000"));
    }
}
