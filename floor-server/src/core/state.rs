use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;

use crate::core::Config;
use crate::orders::{ManagerConfig, OrdersManager};
use crate::services::{Catalog, InMemoryCatalog, LogNotifier, RateTaxService};

/// Server state - shared handles for all request handlers
///
/// Cloning is cheap: the manager lives behind an `Arc`, and every
/// handler touches storage exclusively through it.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Order lifecycle manager (storage, audit, catalog, tax)
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// Initialize the full state from configuration
    ///
    /// Opens the databases, loads the catalog, seeds the floor layout
    /// on first start and logs what survived a restart.
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        config
            .ensure_work_dir_structure()
            .with_context(|| format!("failed to create work dir {}", config.work_dir))?;

        let catalog: Arc<dyn Catalog> = match &config.catalog_file {
            Some(path) => {
                let loaded = InMemoryCatalog::from_file(path)
                    .with_context(|| format!("failed to load catalog file {path}"))?;
                tracing::info!(path, "Catalog loaded from file");
                Arc::new(loaded)
            }
            None => {
                tracing::info!("No catalog file configured, using built-in menu");
                Arc::new(InMemoryCatalog::default_menu())
            }
        };

        let tz = Tz::from_str(&config.business_timezone).map_err(|_| {
            anyhow::anyhow!("invalid BUSINESS_TIMEZONE: {}", config.business_timezone)
        })?;

        let manager_config = ManagerConfig {
            join_window_ms: config.session_join_window_mins * 60 * 1000,
            max_lifetime_ms: config.session_max_lifetime_mins * 60 * 1000,
            replay_window_ms: config.closure_replay_window_secs * 1000,
            tz,
        };

        let orders = OrdersManager::new(
            config.orders_db_path(),
            config.audit_db_path(),
            catalog,
            Arc::new(RateTaxService::new(
                config.tax_rate_percent,
                config.tax_enabled,
            )),
            Arc::new(LogNotifier::new()),
            manager_config,
        )
        .context("failed to open order storage")?;

        let seeded = orders.seed_tables(config.table_count, config.table_capacity as i32)?;
        if seeded > 0 {
            tracing::info!(seeded, capacity = config.table_capacity, "Seeded tables");
        }
        orders.log_recovery()?;

        Ok(Self {
            config: config.clone(),
            orders: Arc::new(orders),
        })
    }
}
