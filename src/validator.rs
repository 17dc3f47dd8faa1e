//! Pure, side-effect-free order classification. None of these functions touch
//! the book or mutate the order; they only decide whether an order, as given,
//! is well-formed for the operation about to be attempted.

use crate::errors::RejectionReason;
use crate::order::{Order, OrderStatus, OrderType, Side};

pub struct OrderValidator;

impl OrderValidator {
    /// `allow_partial` lets a resting order that has already taken a partial
    /// fill (`PartiallyExecuted`) pass — used when re-validating an order
    /// that is about to rest in the book after sweeping part of itself away.
    pub fn validate_limit(order: &Order, allow_partial: bool) -> RejectionReason {
        let status_ok = order.status == OrderStatus::Pending
            || (allow_partial && order.status == OrderStatus::PartiallyExecuted);

        if order.price_ticks > 0
            && order.qty > 0
            && matches!(order.side, Side::Buy | Side::Sell)
            && status_ok
            && order.order_id != 0
            && order.linked_order_id == 0
        {
            RejectionReason::None
        } else {
            RejectionReason::InvalidLimitOrder
        }
    }

    pub fn validate_market(order: &Order) -> RejectionReason {
        if order.price_ticks == 0
            && order.qty > 0
            && matches!(order.side, Side::Buy | Side::Sell)
            && order.status == OrderStatus::Pending
            && order.order_id != 0
            && order.linked_order_id == 0
        {
            RejectionReason::None
        } else {
            RejectionReason::InvalidMarketOrder
        }
    }

    pub fn validate_cancel(order: &Order) -> RejectionReason {
        if order.price_ticks == 0
            && order.qty == 0
            && order.side == Side::None
            && order.status == OrderStatus::Pending
            && order.order_id != 0
            && order.linked_order_id != 0
            && order.linked_order_id != order.order_id
        {
            RejectionReason::None
        } else {
            RejectionReason::InvalidCancelOrder
        }
    }

    /// Dispatch by `order_type` ahead of the match loop. `order` is always
    /// `Some` in safe Rust (there is no null-reference analogue), but the
    /// `Option` keeps the `NullOrder` rejection reachable for callers that
    /// model a missing reference that way (e.g. deserializing an optional
    /// incoming event).
    pub fn validate_before_matching(order: Option<&Order>) -> RejectionReason {
        let Some(order) = order else {
            return RejectionReason::NullOrder;
        };
        match order.order_type {
            OrderType::Limit => Self::validate_limit(order, false),
            OrderType::Market => Self::validate_market(order),
            OrderType::Cancel => Self::validate_cancel(order),
        }
    }

    /// The resting side of `add`. Granular book-internal reasons (see
    /// spec.md §6); `MatchingEngine` collapses these to
    /// `OrderBookInvariantViolation` at its public surface via
    /// `RejectionReason::collapse_to_engine_surface`.
    pub fn validate_before_adding(order: &Order) -> RejectionReason {
        match order.order_type {
            OrderType::Market => return RejectionReason::AddingMarketOrder,
            OrderType::Cancel => return RejectionReason::AddingCancelOrder,
            OrderType::Limit => {}
        }
        if order.qty <= 0 {
            return RejectionReason::InvalidQuantity;
        }
        if order.price_ticks <= 0 {
            return RejectionReason::InvalidPrice;
        }
        if order.is_cancelled() {
            return RejectionReason::AddingCancelledOrder;
        }
        if order.is_executed() {
            return RejectionReason::AddingExecutedOrder;
        }
        RejectionReason::None
    }

    /// The resting order targeted by a cancel must still look like a valid,
    /// still-open limit order.
    pub fn validate_before_cancelling(order: &Order) -> RejectionReason {
        Self::validate_before_adding(order)
    }
}
