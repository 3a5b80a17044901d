//! Customer notifications.
//!
//! Confirmations and shipping updates are emitted as structured log events.
//! A real mail transport can hang off these entry points later.

use tracing::info;

use crate::storage::models::OrderView;

/// Emitted once an order is paid.
pub fn order_confirmation(order: &OrderView) {
    info!(
        code = %order.code,
        email = %order.email,
        total = %order.total,
        "order confirmation sent"
    );
}

/// Emitted on every fulfilment status change of a paid order.
pub fn status_update(order: &OrderView) {
    info!(
        code = %order.code,
        email = %order.email,
        status = %order.status,
        "order status update sent"
    );
}
