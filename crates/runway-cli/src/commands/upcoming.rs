//! Upcoming payment projection command implementation

use anyhow::Result;
use runway_core::db::Database;
use runway_core::{fmt_minor, upcoming_payments};

use super::truncate;

pub fn cmd_upcoming(db: &Database, user_id: i64) -> Result<()> {
    let user = db.get_user(user_id)?;
    let payments = upcoming_payments(db, user_id)?;

    if payments.is_empty() {
        println!(
            "No recurring payments detected for {} in the next four weeks.",
            user.name
        );
        return Ok(());
    }

    println!();
    println!("📅 Upcoming payments for {}", user.name);
    println!("   ─────────────────────────────────────────────────────────────");

    for payment in &payments {
        println!(
            "   {:<32} {:>11}  {} ({})",
            truncate(&payment.description, 32),
            fmt_minor(payment.amount),
            payment.projected_date.format("%b %-d"),
            payment.due_label
        );
    }

    Ok(())
}
