//! Order API module
//!
//! All mutations go through the OrdersManager command pipeline; the
//! GET routes read committed state only.

mod handler;

pub use handler::OperatorInfo;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/ready", post(handler::mark_ready))
        .route("/{id}/confirm-payment", post(handler::confirm_payment))
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/cancel", post(handler::cancel))
}
