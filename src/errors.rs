//! The public rejection taxonomy. Every failure path in the matching engine
//! and order book returns one of these instead of panicking or silently
//! dropping the event.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("order is well-formed and was accepted")]
    None,

    #[error("order reference is null")]
    NullOrder,

    #[error("order type is not one of Limit, Market, Cancel")]
    InvalidOrderType,

    #[error("limit order fails validation (price, quantity, side, status, or linkage)")]
    InvalidLimitOrder,

    #[error("market order fails validation (price, quantity, side, status, or linkage)")]
    InvalidMarketOrder,

    #[error("cancel order fails validation (price, quantity, side, status, or linkage)")]
    InvalidCancelOrder,

    #[error("an order with this id is already resting in the book")]
    OrderToBeAddedAlreadyExists,

    #[error("the order targeted by a cancel does not exist in the book")]
    OrderToBeCancelledDoesNotExist,

    #[error("order book invariant violated; this is an implementation bug")]
    OrderBookInvariantViolation,

    // Book-internal reasons. `MatchingEngine::match_order` collapses these
    // into `OrderBookInvariantViolation` at the public engine surface (see
    // SPEC_FULL.md §10); `LimitOrderBook::add`/`cancel` return them directly
    // to callers that want the finer detail.
    #[error("order quantity must be greater than zero")]
    InvalidQuantity,

    #[error("limit order price must be greater than zero")]
    InvalidPrice,

    #[error("market orders do not rest in the book")]
    AddingMarketOrder,

    #[error("cancel orders do not rest in the book")]
    AddingCancelOrder,

    #[error("an order with this id is already resting in the book")]
    AddingDuplicateOrder,

    #[error("cannot add an order that is already cancelled")]
    AddingCancelledOrder,

    #[error("cannot add an order that is already executed")]
    AddingExecutedOrder,
}

impl RejectionReason {
    pub fn is_ok(&self) -> bool {
        matches!(self, RejectionReason::None)
    }

    /// Collapse book-internal reasons into the engine-level public surface
    /// named in spec.md §6 ("collapsed into OrderBookInvariantViolation at
    /// engine-level surface").
    pub fn collapse_to_engine_surface(self) -> RejectionReason {
        match self {
            RejectionReason::InvalidQuantity
            | RejectionReason::InvalidPrice
            | RejectionReason::AddingMarketOrder
            | RejectionReason::AddingCancelOrder
            | RejectionReason::AddingDuplicateOrder
            | RejectionReason::AddingCancelledOrder
            | RejectionReason::AddingExecutedOrder => RejectionReason::OrderBookInvariantViolation,
            other => other,
        }
    }
}
