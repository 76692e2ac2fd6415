//! Dining Session Model
//!
//! A session groups the child orders of one dining visit at a table.
//! A submission joins the live session while the join window since the
//! last order is open and the lifetime cap has not been reached;
//! otherwise a fresh session starts. Closure retires the session.

use serde::{Deserialize, Serialize};

/// One dining visit at a table, from first order through closure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningSession {
    pub id: String,
    pub table_number: String,
    /// Epoch millis of the first order
    pub started_at: i64,
    /// Epoch millis of the most recent order
    pub last_order_at: i64,
    /// Hard lifetime cap; past this the session is stale even if orders
    /// kept arriving inside the join window
    pub expires_at: i64,
}

impl DiningSession {
    pub fn new(
        id: impl Into<String>,
        table_number: impl Into<String>,
        now: i64,
        max_lifetime_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            table_number: table_number.into(),
            started_at: now,
            last_order_at: now,
            expires_at: now + max_lifetime_ms,
        }
    }

    /// Whether a new order may still join this session
    pub fn is_joinable(&self, now: i64, join_window_ms: i64) -> bool {
        !self.is_expired(now) && now - self.last_order_at <= join_window_ms
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Record another order joining the session
    pub fn touch(&mut self, now: i64) {
        self.last_order_at = now;
    }
}
