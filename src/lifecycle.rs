//! Pure derivation of an order's next status from (initial qty, remaining
//! qty, type). No mutation, no I/O — the matching engine calls these and
//! assigns the result to `order.status` itself.

use crate::order::{OrderStatus, OrderType, Quantity};

pub struct OrderLifecycle;

impl OrderLifecycle {
    pub fn after_matching(
        initial_qty: Quantity,
        remaining_qty: Quantity,
        order_type: OrderType,
    ) -> OrderStatus {
        if order_type == OrderType::Cancel {
            return OrderStatus::Executed;
        }

        if remaining_qty == 0 {
            OrderStatus::Executed
        } else if remaining_qty < initial_qty {
            match order_type {
                OrderType::Limit => OrderStatus::PartiallyExecuted,
                _ => OrderStatus::CancelledAfterPartialExecution,
            }
        } else {
            match order_type {
                OrderType::Limit => OrderStatus::Pending,
                _ => OrderStatus::Cancelled,
            }
        }
    }

    pub fn after_cancel_incoming(initial_qty: Quantity, remaining_qty: Quantity) -> OrderStatus {
        if remaining_qty < initial_qty {
            OrderStatus::CancelledAfterPartialExecution
        } else {
            OrderStatus::Cancelled
        }
    }

    /// Returns the current status unchanged if it is neither `Pending` nor
    /// `PartiallyExecuted` — see SPEC_FULL.md §11.2 for why this fallback is
    /// pinned down explicitly rather than left to fall through.
    pub fn after_cancel_resting(current_status: OrderStatus) -> OrderStatus {
        match current_status {
            OrderStatus::Pending => OrderStatus::Cancelled,
            OrderStatus::PartiallyExecuted => OrderStatus::CancelledAfterPartialExecution,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_fill_is_executed_regardless_of_type() {
        assert_eq!(
            OrderLifecycle::after_matching(10, 0, OrderType::Limit),
            OrderStatus::Executed
        );
        assert_eq!(
            OrderLifecycle::after_matching(10, 0, OrderType::Market),
            OrderStatus::Executed
        );
        assert_eq!(
            OrderLifecycle::after_matching(10, 0, OrderType::Cancel),
            OrderStatus::Executed
        );
    }

    #[test]
    fn partial_fill_diverges_by_type() {
        assert_eq!(
            OrderLifecycle::after_matching(10, 4, OrderType::Limit),
            OrderStatus::PartiallyExecuted
        );
        assert_eq!(
            OrderLifecycle::after_matching(10, 4, OrderType::Market),
            OrderStatus::CancelledAfterPartialExecution
        );
    }

    #[test]
    fn no_fill_diverges_by_type() {
        assert_eq!(
            OrderLifecycle::after_matching(10, 10, OrderType::Limit),
            OrderStatus::Pending
        );
        assert_eq!(
            OrderLifecycle::after_matching(10, 10, OrderType::Market),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn after_cancel_incoming_reflects_partial_fill() {
        assert_eq!(
            OrderLifecycle::after_cancel_incoming(10, 10),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderLifecycle::after_cancel_incoming(10, 4),
            OrderStatus::CancelledAfterPartialExecution
        );
    }

    #[test]
    fn after_cancel_resting_maps_open_statuses() {
        assert_eq!(
            OrderLifecycle::after_cancel_resting(OrderStatus::Pending),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderLifecycle::after_cancel_resting(OrderStatus::PartiallyExecuted),
            OrderStatus::CancelledAfterPartialExecution
        );
    }

    #[test]
    fn after_cancel_resting_leaves_terminal_status_unchanged() {
        assert_eq!(
            OrderLifecycle::after_cancel_resting(OrderStatus::Executed),
            OrderStatus::Executed
        );
        assert_eq!(
            OrderLifecycle::after_cancel_resting(OrderStatus::Cancelled),
            OrderStatus::Cancelled
        );
    }
}
