//! quizdeck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "File-backed student quiz platform")]
struct Cli {
    /// Config file path (defaults to ./quizdeck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored quizzes
    List,

    /// Take a quiz: a stored file name, "course:<CODE>", or "general"
    Take {
        target: String,

        /// Seed the shuffle for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Disable the countdown (untimed practice)
        #[arg(long)]
        untimed: bool,

        /// Write the grading result as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Validate quiz document files
    Validate {
        /// A quiz JSON file or a directory of them
        path: PathBuf,
    },

    /// Publish a quiz document into the store
    Publish {
        path: PathBuf,

        /// Admin code matching the store configuration
        #[arg(long)]
        code: String,
    },

    /// Delete a stored quiz
    Delete {
        name: String,

        /// Admin code matching the store configuration
        #[arg(long)]
        code: String,
    },

    /// Create a starter config and sample quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::List => commands::list::execute(config).await,
        Commands::Take {
            target,
            seed,
            untimed,
            report,
        } => commands::take::execute(config, &target, seed, untimed, report.as_deref()).await,
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Publish { path, code } => commands::publish::execute(config, path, &code).await,
        Commands::Delete { name, code } => commands::delete::execute(config, &name, &code).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
