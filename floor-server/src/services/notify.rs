//! Notification sink for order lifecycle events
//!
//! Post-commit events fan out here. The default sink writes structured
//! records to the `notify` log target; a venue integration (pager
//! displays, printer tickets) implements the same trait.

use shared::order::{EventPayload, KitchenType, OrderEvent};

pub trait Notifier: Send + Sync {
    /// A new order has been accepted and routed to its station(s)
    fn order_placed(&self, order_id: &str, table_number: Option<&str>, total: f64);

    /// Every station of an order has reported ready
    fn order_ready(
        &self,
        order_id: &str,
        table_number: Option<&str>,
        kitchen_type: KitchenType,
        forced: bool,
    );

    /// Dispatch an event to the matching hook. Other event types are
    /// settlement facts, not floor notifications.
    fn publish(&self, event: &OrderEvent) {
        match &event.payload {
            EventPayload::OrderPlaced {
                table_number,
                total,
                ..
            } => self.order_placed(&event.order_id, table_number.as_deref(), *total),
            EventPayload::OrderReady {
                table_number,
                kitchen_type,
                forced,
            } => self.order_ready(
                &event.order_id,
                table_number.as_deref(),
                *kitchen_type,
                *forced,
            ),
            _ => {}
        }
    }
}

/// Default sink: structured tracing records under the `notify` target
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn order_placed(&self, order_id: &str, table_number: Option<&str>, total: f64) {
        tracing::info!(
            target: "notify",
            order_id = %order_id,
            table_number = table_number.unwrap_or("-"),
            total = %format!("{:.2}", total),
            "Order placed"
        );
    }

    fn order_ready(
        &self,
        order_id: &str,
        table_number: Option<&str>,
        kitchen_type: KitchenType,
        forced: bool,
    ) {
        tracing::info!(
            target: "notify",
            order_id = %order_id,
            table_number = table_number.unwrap_or("-"),
            kitchen_type = kitchen_type.name(),
            forced,
            "Order ready"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        lines: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn order_placed(&self, order_id: &str, table_number: Option<&str>, _total: f64) {
            self.lines.lock().unwrap().push(format!(
                "placed {} @ {}",
                order_id,
                table_number.unwrap_or("-")
            ));
        }

        fn order_ready(
            &self,
            order_id: &str,
            _table_number: Option<&str>,
            _kitchen_type: KitchenType,
            forced: bool,
        ) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("ready {} forced={}", order_id, forced));
        }
    }

    #[test]
    fn test_publish_routes_by_payload() {
        use shared::order::{OrderEvent, OrderEventType};

        let notifier = RecordingNotifier::default();
        let placed = OrderEvent::new(
            "ord-1".to_string(),
            "op-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                table_number: Some("12".to_string()),
                session_id: None,
                total: 23.0,
            },
        );
        let confirmed = OrderEvent::new(
            "ord-1".to_string(),
            "op-1".to_string(),
            "Ana".to_string(),
            "cmd-2".to_string(),
            OrderEventType::PaymentConfirmed,
            EventPayload::PaymentConfirmed {},
        );

        notifier.publish(&placed);
        notifier.publish(&confirmed);

        let lines = notifier.lines.lock().unwrap();
        assert_eq!(lines.as_slice(), ["placed ord-1 @ 12"]);
    }
}
