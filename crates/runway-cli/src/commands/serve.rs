//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Runway web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    // Parse API keys from environment (comma-separated)
    let api_keys: Vec<String> = std::env::var("RUNWAY_API_KEYS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        println!("   🔒 Authentication: Bearer API key");
        if api_keys.is_empty() {
            println!("      ❌ No keys configured - set RUNWAY_API_KEYS (comma-separated)");
        } else {
            println!(
                "   🔑 API keys: {} configured (RUNWAY_API_KEYS)",
                api_keys.len()
            );
        }
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    if let Some(schedule) = runway_server::ForecastScheduleConfig::from_env() {
        println!(
            "   ⏰ Scheduled forecasts: every {}h (RUNWAY_FORECAST_SCHEDULE)",
            schedule.interval_hours
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = runway_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    runway_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
