//! Redline CLI - main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "redline")]
#[command(version)]
#[command(about = "Inject tracked-change revisions into OOXML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the flat text view of a document
    Extract {
        /// Input .docx file
        input: String,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Compare two documents and print or export the edit list
    Diff {
        /// Original .docx file
        original: String,

        /// Modified plain-text file
        modified: String,

        /// Print the edit list as JSON instead of a human-readable summary
        #[arg(long)]
        json: bool,
    },

    /// Apply an edit list to a document, producing a redlined copy
    Apply {
        /// Original .docx file
        original: String,

        /// JSON edit list or modified plain-text file
        changes: String,

        /// Write output to FILE (default: "<stem>_redlined.docx")
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Revision author (default: $REDLINE_AUTHOR, else "Adeu AI")
        #[arg(long)]
        author: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Extract { input, output } => commands::extract::execute(&input, output.as_deref())?,
        Commands::Diff { original, modified, json } => commands::diff::execute(&original, &modified, json)?,
        Commands::Apply { original, changes, output, author } => {
            commands::apply::execute(&original, &changes, output.as_deref(), author.as_deref())?
        }
    };

    std::process::exit(exit_code);
}
