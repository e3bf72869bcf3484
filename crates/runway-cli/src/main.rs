//! Runway CLI - 13-week cash-flow forecaster
//!
//! Usage:
//!   runway init                          Initialize database
//!   runway users add "Acme Ltd"          Create a user
//!   runway import --file txns.csv -u 1   Import transactions
//!   runway forecast --user 1             Generate a forecast
//!   runway serve --port 3000             Start web server

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

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add { name, buffer }) => {
                    commands::cmd_users_add(&db, &name, buffer.as_deref())
                }
                Some(UsersAction::SetBuffer { id, amount }) => {
                    commands::cmd_users_set_buffer(&db, id, amount.as_deref())
                }
            }
        }
        Commands::Import {
            file,
            user,
            no_forecast,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, user, &file, no_forecast)
        }
        Commands::Forecast { user, all } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            if all {
                commands::cmd_forecast_all(&db)
            } else {
                match user {
                    Some(user_id) => commands::cmd_forecast(&db, user_id),
                    None => anyhow::bail!("specify --user <ID> or --all"),
                }
            }
        }
        Commands::Upcoming { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_upcoming(&db, user)
        }
        Commands::Alerts { user, all } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_alerts(&db, user, all)
        }
        Commands::Dismiss { alert_id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_alerts_dismiss(&db, alert_id)
        }
        Commands::Restore { alert_id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_alerts_restore(&db, alert_id)
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
    }
}
