//! Comanda Floor Server - table-order coordination for dine-in service
//!
//! # Modules
//!
//! ```text
//! floor-server/src/
//! ├── core/       # Config, state, HTTP server
//! ├── api/        # Routes and handlers
//! ├── orders/     # Command pipeline, storage, audit
//! ├── services/   # Catalog, tax, kitchen routing, notifications
//! └── utils/      # Logging, validation
//! ```
//!
//! # Lifecycle
//!
//! Orders are submitted per table (or as pickups), marked ready by the
//! food and beverage kitchens, and settled in a single consolidated
//! closure per table where tax is computed exactly once.

pub mod api;
pub mod core;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export common types
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}

/// Load .env, prepare the work directory and wire up logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        log_dir.to_str(),
    )?;
    cleanup_old_logs(&log_dir)?;

    Ok(())
}
