//! Core module - configuration, state and HTTP server
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared handles for request handlers
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
