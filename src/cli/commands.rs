//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "careerpath")]
#[command(about = "Career matching engine: skill extraction, semantic ranking and guidance chat")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the config file (default: config.toml, then config.example.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Vector index operations
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
    /// Rank careers for a skill list or a resume file
    Match {
        /// Comma-separated skill list
        #[arg(short, long)]
        skills: Option<String>,
        /// Path to a plain-text resume
        #[arg(short, long)]
        resume: Option<String>,
        /// Number of matches to show
        #[arg(short = 'n', long, default_value = "5")]
        top_n: usize,
        /// Skip the vector index even when available
        #[arg(long)]
        no_semantic: bool,
    },
    /// Analyze fit against one named career
    Analyze {
        /// Career title to analyze against
        career: String,
        /// Comma-separated skill list
        #[arg(short, long)]
        skills: Option<String>,
        /// Path to a plain-text resume
        #[arg(short, long)]
        resume: Option<String>,
    },
    /// Skills corpus management
    Corpus {
        #[command(subcommand)]
        command: CorpusCommands,
    },
}

#[derive(Subcommand)]
pub enum IndexCommands {
    /// Embed the corpus and write the index artifact
    Build,
    /// Show artifact metadata
    Info,
}

#[derive(Subcommand)]
pub enum CorpusCommands {
    /// Seed the database with the sample career corpus
    Seed,
    /// Export the corpus as JSON (career -> skills map)
    Export {
        /// Output path
        #[arg(default_value = "career_skills.json")]
        path: String,
    },
    /// Import careers from a JSON export
    Import {
        /// Input path
        path: String,
    },
    /// Search careers by a comma-separated skill list
    Search {
        /// Comma-separated skill list
        skills: String,
    },
}
