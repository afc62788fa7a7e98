//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Goalcast - Forecast when you will reach your savings goals
#[derive(Parser)]
#[command(name = "goalcast")]
#[command(about = "Savings goal forecasting from transaction history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "goalcast.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.config/goalcast/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set GOALCAST_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV (columns: date, amount, [description, category, type])
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List recent transactions
    Transactions {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Fit the savings trend model on all transactions
    Train,

    /// Predict monthly savings for the coming months and write them as JSON
    Forecast {
        /// Number of months to forecast (defaults to config forecast.horizon_months)
        #[arg(short, long)]
        months: Option<usize>,

        /// Output file (defaults to config forecast.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read transactions from a JSON array file instead of the database
        #[arg(long)]
        from_json: Option<PathBuf>,
    },

    /// Project when a savings target is reached
    Project {
        /// Target amount (defaults to config goal.default_target)
        #[arg(short, long)]
        target: Option<f64>,

        /// Current savings (defaults to the sum of all transactions)
        #[arg(short, long)]
        current: Option<f64>,

        /// Projection start date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Read transactions from a JSON array file instead of the database
        #[arg(long)]
        from_json: Option<PathBuf>,
    },

    /// Manage saved goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Show the active trend model and training history
    Model {
        /// Number of previous fits to show
        #[arg(long, default_value = "5")]
        history: i64,
    },

    /// Show database and model status
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key from GOALCAST_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List saved goals
    List,

    /// Save a new goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        #[arg(short, long)]
        target: f64,

        /// Savings already put towards the goal
        #[arg(short, long, default_value = "0")]
        current: f64,
    },

    /// Record current savings for a goal
    Savings {
        /// Goal ID
        id: i64,

        /// New current savings
        amount: f64,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },

    /// Project a saved goal
    Project {
        /// Goal ID
        id: i64,

        /// Projection start date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },
}
