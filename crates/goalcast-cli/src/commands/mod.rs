//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config, parse_as_of)
//! - `forecast` - Forecasting commands (train, forecast, project, model)
//! - `goals` - Saved goal commands (list, add, savings, delete, project)
//! - `import` - CSV import
//! - `serve` - Web server command
//! - `status` - Database and model status
//! - `transactions` - Transaction listing

pub mod core;
pub mod forecast;
pub mod goals;
pub mod import;
pub mod serve;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use forecast::*;
pub use goals::*;
pub use import::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
