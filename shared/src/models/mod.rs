//! Data models
//!
//! Shared between floor-server and frontend (via API).
//! Catalog IDs are `i64`; table numbers and session IDs are strings.

pub mod dining_table;
pub mod product;
pub mod session;

// Re-exports
pub use dining_table::*;
pub use product::*;
pub use session::*;
