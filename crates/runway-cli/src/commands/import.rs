//! CSV ingest command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use runway_core::db::Database;
use runway_core::{ingest_csv, ForecastEngine};

pub fn cmd_import(db: &Database, user_id: i64, file: &Path, no_forecast: bool) -> Result<()> {
    let user = db.get_user(user_id)?;

    println!("📥 Importing {} for {}...", file.display(), user.name);

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let summary = ingest_csv(db, user_id, csv_file)?;

    println!("✅ Import complete!");
    println!("   Imported: {}", summary.imported);
    println!("   Skipped (duplicates): {}", summary.skipped);

    // Regenerate the forecast so the new history is reflected (unless --no-forecast)
    if summary.imported > 0 && !no_forecast {
        println!();
        println!("📈 Regenerating forecast...");
        let run = ForecastEngine::new(db).generate(user_id)?;
        super::print_forecast_run(&run);
    }

    Ok(())
}
