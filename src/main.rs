use std::path::PathBuf;

use clap::{Parser, Subcommand};
use projwiki::AppError;

#[derive(Parser)]
#[command(name = "projwiki")]
#[command(version)]
#[command(
    about = "Maintain firmware module documentation and AI fill tasks",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan sources and scaffold missing module documentation
    #[clap(visible_alias = "s")]
    Scaffold {
        /// Use the AI fill template and collect pending tasks
        #[arg(long)]
        ai_fill: bool,
    },
    /// Work through a persisted AI task batch
    #[clap(visible_alias = "c")]
    Complete {
        /// Task batch JSON file
        task_file: PathBuf,
        /// Generate the prompt file without the interactive menu
        #[arg(long)]
        generate_prompts: bool,
        /// Output path for the generated prompt file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare documentation and source modification times
    #[clap(visible_alias = "ck")]
    Check,
    /// Build the self-contained HTML viewer
    #[clap(visible_alias = "b")]
    Build {
        /// Project name shown in the viewer
        #[arg(long)]
        project: Option<String>,
    },
    /// Rewrite task file paths using a mapping file
    Remap {
        /// Task batch JSON file
        task_file: PathBuf,
        /// TOML file with a [mapping] table of old = new paths
        map_file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Scaffold { ai_fill } => projwiki::scaffold(ai_fill).map(|_| ()),
        Commands::Complete { task_file, generate_prompts, output } => {
            projwiki::complete(&task_file, generate_prompts, output.as_deref())
        }
        Commands::Check => projwiki::check().map(|_| ()),
        Commands::Build { project } => projwiki::build_site(project.as_deref()).map(|_| ()),
        Commands::Remap { task_file, map_file } => {
            projwiki::remap(&task_file, &map_file).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}
