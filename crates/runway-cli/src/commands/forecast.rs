//! Forecast generation command implementations

use anyhow::Result;
use runway_core::db::Database;
use runway_core::{fmt_minor, AlertSeverity, ForecastEngine, ForecastRun};

/// Print the week-by-week result of a forecast run
pub fn print_forecast_run(run: &ForecastRun) {
    println!("   Current cash: {}", fmt_minor(run.current_cash));
    println!();
    println!("   Week                 Income      Expenses    Projected");
    println!("   ─────────────────────────────────────────────────────────");

    for week in &run.weeks {
        let marker = if week.projected < 0 { " ❗" } else { "" };
        println!(
            "   {:<18} {:>11} {:>11} {:>12}{}",
            week.week_label,
            fmt_minor(week.income),
            fmt_minor(week.expenses),
            fmt_minor(week.projected),
            marker
        );
    }

    println!();
    match run.alert {
        Some(AlertSeverity::Critical) => {
            println!("   🚨 Critical alert raised: projected cash goes negative.");
            println!("      Run 'runway alerts --user <ID>' for details.");
        }
        Some(AlertSeverity::Warning) => {
            println!("   ⚠️  Warning raised: projected cash dips below the safety buffer.");
            println!("      Run 'runway alerts --user <ID>' for details.");
        }
        None => println!("   ✅ No low-cash weeks in the 13-week horizon."),
    }
}

pub fn cmd_forecast(db: &Database, user_id: i64) -> Result<()> {
    let user = db.get_user(user_id)?;

    println!("📈 Generating 13-week forecast for {}...", user.name);
    println!();

    let run = ForecastEngine::new(db).generate(user_id)?;
    print_forecast_run(&run);

    Ok(())
}

pub fn cmd_forecast_all(db: &Database) -> Result<()> {
    println!("📈 Generating forecasts for all users...");

    let outcome = ForecastEngine::new(db).generate_all()?;

    println!("✅ Batch complete!");
    println!("   Succeeded: {}", outcome.succeeded);
    if outcome.failed > 0 {
        println!("   ❌ Failed: {}", outcome.failed);
    }

    Ok(())
}
