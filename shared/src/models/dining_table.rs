//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    /// Out of service, rejects new orders
    Maintenance,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    /// Human-facing table number ("12", "P3"), unique per venue
    pub table_number: String,
    pub name: String,
    pub capacity: i32,
    pub status: TableStatus,
    /// Session currently seated at this table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl DiningTable {
    pub fn new(table_number: impl Into<String>, capacity: i32) -> Self {
        let table_number = table_number.into();
        Self {
            name: format!("Table {}", table_number),
            table_number,
            capacity,
            status: TableStatus::Available,
            session_id: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }

    pub fn accepts_orders(&self) -> bool {
        self.status != TableStatus::Maintenance
    }

    /// Mark the table as seated by the given session
    pub fn occupy(&mut self, session_id: impl Into<String>) {
        self.status = TableStatus::Occupied;
        self.session_id = Some(session_id.into());
    }

    /// Release the table back to the floor
    pub fn release(&mut self) {
        self.status = TableStatus::Available;
        self.session_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_available() {
        let table = DiningTable::new("12", 4);
        assert_eq!(table.table_number, "12");
        assert_eq!(table.name, "Table 12");
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.session_id.is_none());
    }

    #[test]
    fn test_occupy_and_release() {
        let mut table = DiningTable::new("3", 2);
        table.occupy("ses-1");
        assert!(table.is_occupied());
        assert_eq!(table.session_id.as_deref(), Some("ses-1"));

        table.release();
        assert!(!table.is_occupied());
        assert!(table.session_id.is_none());
    }
}
