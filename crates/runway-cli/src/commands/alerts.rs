//! Alert command implementations (list, dismiss, restore)

use anyhow::Result;
use runway_core::db::Database;
use runway_core::AlertSeverity;

pub fn cmd_alerts(db: &Database, user_id: i64, include_dismissed: bool) -> Result<()> {
    let user = db.get_user(user_id)?;
    let alerts = db.list_alerts(user_id, include_dismissed)?;

    let active: Vec<_> = alerts.iter().filter(|a| !a.dismissed).collect();

    if active.is_empty() && !include_dismissed {
        println!("✅ No active alerts for {}.", user.name);
        return Ok(());
    }

    println!();
    println!("⚠️  Alerts for {}", user.name);
    println!("   ─────────────────────────────────────────────────────────────");

    for alert in &alerts {
        if !include_dismissed && alert.dismissed {
            continue;
        }

        let severity_icon = match alert.severity {
            AlertSeverity::Critical => "🚨",
            AlertSeverity::Warning => "⚠️ ",
        };
        let dismissed_mark = if alert.dismissed { " (dismissed)" } else { "" };

        println!("   {} [{}] {}{}", severity_icon, alert.id, alert.title, dismissed_mark);
        println!("      {}", alert.message);
        println!();
    }

    Ok(())
}

pub fn cmd_alerts_dismiss(db: &Database, alert_id: i64) -> Result<()> {
    db.dismiss_alert(alert_id)?;
    println!("✅ Alert {} dismissed.", alert_id);
    Ok(())
}

pub fn cmd_alerts_restore(db: &Database, alert_id: i64) -> Result<()> {
    db.restore_alert(alert_id)?;
    println!("✅ Alert {} restored.", alert_id);
    Ok(())
}
