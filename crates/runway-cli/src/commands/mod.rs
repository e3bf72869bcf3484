//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `alerts` - Alert listing and dismiss/restore commands
//! - `forecast` - Forecast generation commands (single user and batch)
//! - `import` - CSV ingest command
//! - `serve` - Web server command
//! - `status` - Database status command
//! - `upcoming` - Upcoming payment projection command
//! - `users` - User management commands

pub mod alerts;
pub mod core;
pub mod forecast;
pub mod import;
pub mod serve;
pub mod status;
pub mod upcoming;
pub mod users;

// Re-export command functions for main.rs
pub use alerts::*;
pub use core::*;
pub use forecast::*;
pub use import::*;
pub use serve::*;
pub use status::*;
pub use upcoming::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
