//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod alerts;
pub mod forecasts;
pub mod transactions;
pub mod upcoming;
pub mod users;

// Re-export all handlers for use in router
pub use alerts::*;
pub use forecasts::*;
pub use transactions::*;
pub use upcoming::*;
pub use users::*;
