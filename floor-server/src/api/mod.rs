//! API route modules
//!
//! - [`health`] - health checks
//! - [`orders`] - order lifecycle commands and lookups
//! - [`tables`] - floor layout, table queries, table closure

pub mod convert;

pub mod health;
pub mod orders;
pub mod tables;
