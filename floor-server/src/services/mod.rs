//! Injected service collaborators
//!
//! Everything the order core consumes but does not own: catalog lookup,
//! tax computation, kitchen classification, and notification delivery.
//! Each is a trait constructed once at startup and injected through
//! [`crate::core::ServerState`]; there are no process-wide singletons.

pub mod catalog;
pub mod kitchen;
pub mod notify;
pub mod tax;

pub use catalog::{Catalog, InMemoryCatalog};
pub use kitchen::{KitchenClassifier, ReadinessReport};
pub use notify::{LogNotifier, Notifier};
pub use tax::{RateTaxService, TaxService};
