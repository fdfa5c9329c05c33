//! Interactive console menu for working through a task batch.

use std::io::ErrorKind;
use std::path::Path;

use chrono::Local;
use dialoguer::{Error as DialoguerError, Input, Select};

use crate::error::AppError;
use crate::prompt::{build_prompt, order_by_priority, write_prompt_file};
use crate::task::{FillTask, Priority};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    GeneratePrompts,
    ShowTask,
    MarkCompleted,
    Quit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 4] = [
        MenuChoice::GeneratePrompts,
        MenuChoice::ShowTask,
        MenuChoice::MarkCompleted,
        MenuChoice::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::GeneratePrompts => "Generate the full prompt file (for the AI assistant)",
            MenuChoice::ShowTask => "Show one task in detail",
            MenuChoice::MarkCompleted => "Mark a task as completed",
            MenuChoice::Quit => "Quit",
        }
    }
}

fn priority_mark(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

fn print_overview(ordered: &[&FillTask]) {
    let count_of = |tier: Priority| ordered.iter().filter(|t| t.priority == tier).count();

    println!("\n{}", "=".repeat(80));
    println!("AI fill interactive mode");
    println!("{}", "=".repeat(80));
    println!("\n{} pending task(s)\n", ordered.len());
    println!("Overview:");
    println!("  high:   {}", count_of(Priority::High));
    println!("  medium: {}", count_of(Priority::Medium));
    println!("  low:    {}", count_of(Priority::Low));
    println!();

    for (idx, task) in ordered.iter().enumerate() {
        println!(
            "{:3}. {} [{}] {}",
            idx + 1,
            priority_mark(task.priority),
            task.module_name,
            task.identifier
        );
        println!("     File: {}", task.file_path);
        println!("     Type: {}", task.task_type);
        println!();
    }
}

/// Run the menu loop until the operator quits or interrupts.
pub fn run(tasks: &[FillTask], project_root: &Path, task_file: &Path) -> Result<(), AppError> {
    let ordered = order_by_priority(tasks);
    print_overview(&ordered);

    loop {
        let items: Vec<&str> = MenuChoice::ALL.iter().map(|choice| choice.label()).collect();
        let selection = match Select::new()
            .with_prompt("Select an action")
            .items(&items)
            .default(0)
            .interact()
        {
            Ok(selection) => selection,
            Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => return Ok(()),
            Err(err) => {
                return Err(AppError::config_error(format!("Menu selection failed: {}", err)));
            }
        };

        match MenuChoice::ALL[selection] {
            MenuChoice::GeneratePrompts => {
                let output = task_file
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join(format!("ai_prompts_{}.md", Local::now().format("%Y%m%d_%H%M%S")));
                println!("[INFO] Generating prompt file: {}", output.display());
                write_prompt_file(tasks, &output, project_root)?;
                println!("[OK] Prompt file generated. Hand it to the AI assistant:");
                println!("  {}", output.display());
            }
            MenuChoice::ShowTask => {
                show_task(&ordered, project_root)?;
            }
            MenuChoice::MarkCompleted => {
                println!("[INFO] Completion tracking is not implemented yet; edit the document directly.");
            }
            MenuChoice::Quit => return Ok(()),
        }
    }
}

/// Prompt for a task number and print that task's assembled prompt.
/// Invalid input is reported inline; the menu loop continues.
fn show_task(ordered: &[&FillTask], project_root: &Path) -> Result<(), AppError> {
    let raw: String = match Input::new().with_prompt("Task number").interact_text() {
        Ok(value) => value,
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => return Ok(()),
        Err(err) => {
            return Err(AppError::config_error(format!("Failed to read task number: {}", err)));
        }
    };

    let Ok(number) = raw.trim().parse::<usize>() else {
        println!("[ERROR] Please enter a valid number");
        return Ok(());
    };

    match number.checked_sub(1).and_then(|idx| ordered.get(idx)) {
        Some(task) => println!("\n{}", build_prompt(task, project_root)),
        None => println!("[ERROR] Invalid task number: {}", number),
    }

    Ok(())
}
