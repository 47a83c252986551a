use careerpath::cli::commands::Cli;
use careerpath::cli::commands::Commands;
use careerpath::cli::commands::CorpusCommands;
use careerpath::cli::commands::IndexCommands;
use careerpath::cli::handlers;
use careerpath::config::AppConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    careerpath::logging::init_logging(Some(&config))?;

    match cli.command {
        Commands::Serve { host, port } => {
            handlers::handle_serve(&config, host, port).await?;
        }
        Commands::Index { command } => match command {
            IndexCommands::Build => {
                handlers::handle_index_build(&config).await?;
            }
            IndexCommands::Info => {
                handlers::handle_index_info(&config)?;
            }
        },
        Commands::Match {
            skills,
            resume,
            top_n,
            no_semantic,
        } => {
            handlers::handle_match(&config, skills, resume, top_n, no_semantic).await?;
        }
        Commands::Analyze {
            career,
            skills,
            resume,
        } => {
            handlers::handle_analyze(&config, career, skills, resume).await?;
        }
        Commands::Corpus { command } => match command {
            CorpusCommands::Seed => {
                handlers::handle_corpus_seed(&config).await?;
            }
            CorpusCommands::Export { path } => {
                handlers::handle_corpus_export(&config, path).await?;
            }
            CorpusCommands::Import { path } => {
                handlers::handle_corpus_import(&config, path).await?;
            }
            CorpusCommands::Search { skills } => {
                handlers::handle_corpus_search(&config, skills).await?;
            }
        },
    }

    Ok(())
}
