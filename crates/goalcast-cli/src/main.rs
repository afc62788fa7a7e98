//! Goalcast CLI - Savings goal forecasting
//!
//! Usage:
//!   goalcast init                       Initialize database
//!   goalcast import --file CSV          Import transactions
//!   goalcast train                      Fit the savings trend model
//!   goalcast forecast --months 3        Write predicted monthly savings
//!   goalcast project --target 50000     Project goal completion
//!   goalcast serve --port 3000          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Transactions { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_transactions_list(&db, limit)
        }
        Commands::Train => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_train(&db, &config)
        }
        Commands::Forecast {
            months,
            output,
            from_json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_forecast(
                &db,
                &config,
                months,
                output.as_deref(),
                from_json.as_deref(),
            )
        }
        Commands::Project {
            target,
            current,
            as_of,
            from_json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let as_of = commands::parse_as_of(as_of.as_deref())?;
            commands::cmd_project(&db, &config, target, current, as_of, from_json.as_deref())
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db),
                Some(GoalsAction::Add {
                    name,
                    target,
                    current,
                }) => commands::cmd_goals_add(&db, &name, target, current),
                Some(GoalsAction::Savings { id, amount }) => {
                    commands::cmd_goals_savings(&db, id, amount)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, id),
                Some(GoalsAction::Project { id, as_of }) => {
                    let as_of = commands::parse_as_of(as_of.as_deref())?;
                    commands::cmd_goals_project(&db, &config, id, as_of)
                }
            }
        }
        Commands::Model { history } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_model(&db, &config, history)
        }
        Commands::Status => commands::cmd_status(&cli.db, &config, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, config, &host, port, no_auth, cli.no_encrypt).await,
    }
}
