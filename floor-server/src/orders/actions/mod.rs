//! Command action handlers
//!
//! One struct per mutating command, each implementing
//! [`CommandHandler`](crate::orders::traits::CommandHandler); the
//! manager constructs the action from the command payload and runs it
//! inside one write transaction. `query_table` is the read-only view
//! builder used by the table query endpoint.

pub mod cancel_order;
pub mod close_table;
pub mod complete_order;
pub mod confirm_payment;
pub mod mark_ready;
pub mod query_table;
pub mod submit_order;

pub use cancel_order::CancelOrderAction;
pub use close_table::CloseTableAction;
pub use complete_order::CompleteOrderAction;
pub use confirm_payment::ConfirmPaymentAction;
pub use mark_ready::MarkReadyAction;
pub use query_table::{ItemView, OrderView, PriceSource, TableOrdersView, build_table_view};
pub use submit_order::SubmitOrderAction;
