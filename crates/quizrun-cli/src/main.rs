//! quizrun CLI: timed quizzes in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizrun", version, about = "Timed terminal quiz runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Run {
        /// Path to a .toml question set (defaults to `question_set` in config)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Output directory for reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report formats: json, html, markdown, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Hide the running timer
        #[arg(long)]
        no_timer: bool,
    },

    /// Validate question-set TOML files
    Validate {
        /// Path to question-set file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Generate a random maths question set
    Generate {
        /// Destination .toml file
        #[arg(long)]
        output: PathBuf,

        /// Seed for reproducible sets
        #[arg(long)]
        seed: Option<u64>,

        /// Question set name
        #[arg(long, default_value = "Maths Practice")]
        name: String,
    },

    /// Create starter config and example question set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizrun=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            questions,
            output,
            format,
            config,
            no_timer,
        } => commands::run::execute(questions, output, format, config, no_timer).await,
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Generate { output, seed, name } => {
            commands::generate::execute(output, seed, name)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
