//! User management command implementations

use anyhow::{Context, Result};
use runway_core::db::Database;
use runway_core::{fmt_minor, parse_minor};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users found. Add one with:");
        println!("  runway users add \"Acme Ltd\"");
        return Ok(());
    }

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        let buffer = match user.cash_buffer {
            Some(b) => format!("buffer {}", fmt_minor(b)),
            None => "default buffer".to_string(),
        };
        println!("   [{}] {} ({})", user.id, user.name, buffer);
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, name: &str, buffer: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("user name cannot be empty");
    }

    let user_id = db.create_user(name)?;

    if let Some(raw) = buffer {
        let amount = parse_minor(raw).with_context(|| format!("invalid buffer '{}'", raw))?;
        if amount < 0 {
            anyhow::bail!("buffer cannot be negative");
        }
        db.set_cash_buffer(user_id, Some(amount))?;
        println!(
            "✅ Created user [{}] {} with buffer {}",
            user_id,
            name,
            fmt_minor(amount)
        );
    } else {
        println!("✅ Created user [{}] {}", user_id, name);
    }

    Ok(())
}

pub fn cmd_users_set_buffer(db: &Database, user_id: i64, amount: Option<&str>) -> Result<()> {
    // Surface a clear error for unknown users before touching the buffer
    let user = db.get_user(user_id)?;

    match amount {
        Some(raw) => {
            let minor = parse_minor(raw).with_context(|| format!("invalid buffer '{}'", raw))?;
            if minor < 0 {
                anyhow::bail!("buffer cannot be negative");
            }
            db.set_cash_buffer(user_id, Some(minor))?;
            println!("✅ Buffer for {} set to {}", user.name, fmt_minor(minor));
        }
        None => {
            db.set_cash_buffer(user_id, None)?;
            println!("✅ Buffer for {} reverted to the default", user.name);
        }
    }

    Ok(())
}
