//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod forecast;
pub mod goals;
pub mod health;
pub mod projection;
pub mod transactions;

// Re-export all handlers for use in router
pub use forecast::*;
pub use goals::*;
pub use health::*;
pub use projection::*;
pub use transactions::*;
