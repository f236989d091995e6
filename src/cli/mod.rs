use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::AppConfig;

pub mod import;
pub mod init;
pub mod query;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Create the database and its schema
    Init {},
    /// Load people and mails from a JSON dataset
    Import {
        /// Path to the dataset file
        #[arg(long)]
        file: String,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8080")]
        port: String,
    },
    /// Print the mail graph for a filter as JSON
    Query {
        /// Date as M/D/YYYY or YYYY-MM-DD with an optional HH:MM time
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        from: String,
        #[arg(long, default_value = "")]
        to: String,
        /// Maximum number of receivers per mail
        #[arg(long, default_value = "")]
        limit: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config.db_path).await?;
        }
        Some(Command::Import { file }) => {
            import::run(&file, &config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Query {
            start_date,
            end_date,
            subject,
            from,
            to,
            limit,
        }) => {
            let params = query::QueryParams {
                start_date,
                end_date,
                subject,
                from,
                to,
                limit,
            };
            query::run(params, &config.db_path).await?;
        }
        None => {}
    }

    Ok(())
}
