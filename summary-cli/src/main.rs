//! summary-memory CLI: add chat turns, print history, summarize history. Config from
//! env (.env supported) with CLI flags taking precedence.

use anyhow::{Context, Result};
use clap::Parser;
use summary_cli::commands::{database_url, handle_add, handle_history, handle_summarize, render_result};
use summary_cli::{init_tracing, Cli, Commands};
use summary_memory::SummaryMemoryConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_file = std::env::var("LOG_FILE").ok().filter(|s| !s.is_empty());
    init_tracing(log_file.as_deref())?;

    let cli = Cli::parse();
    let database_url = database_url();
    let config = SummaryMemoryConfig::from_env().context("Load summary config from env")?;

    match cli.command {
        Commands::Add {
            session,
            sender,
            name,
            text,
        } => {
            let record = handle_add(&database_url, &session, &sender, name, text).await?;
            println!(
                "Added message {} to session {}",
                record.sequence_position(),
                record.session_id()
            );
        }
        Commands::History { query } => {
            println!("{}", handle_history(&database_url, &config, &query).await?);
        }
        Commands::Summarize {
            query,
            character_limit,
            budget_unit,
            prompt,
            model,
        } => {
            let result = handle_summarize(
                &database_url,
                config,
                &query,
                character_limit,
                budget_unit.as_deref(),
                prompt.as_deref(),
                model.as_deref(),
            )
            .await?;
            println!("{}", render_result(&result));
        }
    }

    Ok(())
}
