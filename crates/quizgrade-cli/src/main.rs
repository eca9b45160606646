//! quizgrade CLI: validate, grade and render question banks.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizgrade", version, about = "Polymorphic question grading engine")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question bank files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Exit code 1 if any warning is found
        #[arg(long)]
        strict: bool,
    },

    /// Grade a submission against a question bank
    Grade {
        /// Question bank file (.toml or .json)
        #[arg(long)]
        bank: PathBuf,

        /// JSON file mapping question ids to responses
        #[arg(long)]
        responses: PathBuf,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, markdown, all
        #[arg(long)]
        format: Option<String>,

        /// Print the report JSON to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Render one question for a learner or a reviewer
    Render {
        /// Question bank file (.toml or .json)
        #[arg(long)]
        bank: PathBuf,

        /// Question id within the bank
        #[arg(long)]
        question: String,

        /// View: learner or reviewer
        #[arg(long, default_value = "learner")]
        view: String,
    },

    /// List the supported question types
    Types {
        /// Filter by category (basic, open, interactive, visual, complex)
        #[arg(long)]
        category: Option<String>,

        /// Print the default definition and answer schema for one type
        #[arg(long)]
        template: Option<String>,
    },

    /// Create starter config and example question bank
    Init,
}

fn init_tracing(log_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter))
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };
    init_tracing(&config.log_filter);

    let result = match cli.command {
        Commands::Validate { bank, strict } => commands::validate::execute(bank, strict, &config),
        Commands::Grade {
            bank,
            responses,
            output,
            format,
            stdout,
        } => commands::grade::execute(bank, responses, output, format, stdout, &config),
        Commands::Render {
            bank,
            question,
            view,
        } => commands::render::execute(bank, question, view),
        Commands::Types { category, template } => commands::types::execute(category, template),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
