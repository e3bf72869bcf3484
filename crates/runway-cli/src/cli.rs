//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Runway - 13-week cash-flow forecasting for small businesses
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Self-hosted cash-flow forecaster", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "runway.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set RUNWAY_DB_KEY environment variable with your passphrase.
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

    /// Manage users (list, add, set-buffer)
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Import transactions from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// User to import transactions for
        #[arg(short, long)]
        user: i64,

        /// Skip forecast regeneration after import
        #[arg(long)]
        no_forecast: bool,
    },

    /// Generate a 13-week forecast
    Forecast {
        /// User to generate a forecast for
        #[arg(short, long)]
        user: Option<i64>,

        /// Generate forecasts for every user
        #[arg(long)]
        all: bool,
    },

    /// Show projected upcoming payments
    Upcoming {
        /// User to project payments for
        #[arg(short, long)]
        user: i64,
    },

    /// List low-cash alerts
    Alerts {
        /// User whose alerts to show
        #[arg(short, long)]
        user: i64,

        /// Include dismissed alerts
        #[arg(long)]
        all: bool,
    },

    /// Dismiss an alert
    Dismiss {
        /// Alert ID
        alert_id: i64,
    },

    /// Restore a dismissed alert
    Restore {
        /// Alert ID
        alert_id: i64,
    },

    /// Show database status (encryption, size, etc.)
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
        /// By default, the server requires a Bearer API key from RUNWAY_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Add a new user
    Add {
        /// Display name for the business
        name: String,

        /// Safety buffer, e.g. "25000.00" (defaults to the built-in buffer)
        #[arg(long)]
        buffer: Option<String>,
    },

    /// Set or clear a user's safety buffer
    SetBuffer {
        /// User ID
        id: i64,

        /// New buffer, e.g. "10000.00" (omit to revert to the default)
        amount: Option<String>,
    },
}
