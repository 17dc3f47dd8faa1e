//! Order value type: immutable identity plus mutable residual quantity and status.

/// Which direction an order trades in. `None` is only valid for `Cancel` orders,
/// which do not take a market side of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    PartiallyExecuted,
    Executed,
    Cancelled,
    CancelledAfterPartialExecution,
}

impl OrderStatus {
    /// Resting orders are Pending or PartiallyExecuted; anything else is terminal.
    pub fn is_resting(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::PartiallyExecuted)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_resting()
    }
}

pub type OrderId = u32;
pub type OwnerId = u32;
pub type PriceTicks = i32;
pub type Quantity = i32;
pub type Timestamp = u64;

/// A single order. `order_id` and `owner_id` never change once constructed;
/// `qty` and `status` are the only mutable fields, updated by the matching
/// engine and order book as the order's residual quantity is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_id: OrderId,
    pub owner_id: OwnerId,
    pub price_ticks: PriceTicks,
    pub qty: Quantity,
    pub side: Side,
    pub order_type: OrderType,
    pub timestamp: Timestamp,
    pub status: OrderStatus,
    /// Target of a `Cancel` order; zero (and meaningless) for all other types.
    pub linked_order_id: OrderId,
}

impl Order {
    /// Construct a resting-eligible limit order. `status` starts at `Pending`.
    pub fn new_limit(
        order_id: OrderId,
        owner_id: OwnerId,
        price_ticks: PriceTicks,
        qty: Quantity,
        side: Side,
        timestamp: Timestamp,
    ) -> Self {
        Order {
            order_id,
            owner_id,
            price_ticks,
            qty,
            side,
            order_type: OrderType::Limit,
            timestamp,
            status: OrderStatus::Pending,
            linked_order_id: 0,
        }
    }

    pub fn new_market(
        order_id: OrderId,
        owner_id: OwnerId,
        qty: Quantity,
        side: Side,
        timestamp: Timestamp,
    ) -> Self {
        Order {
            order_id,
            owner_id,
            price_ticks: 0,
            qty,
            side,
            order_type: OrderType::Market,
            timestamp,
            status: OrderStatus::Pending,
            linked_order_id: 0,
        }
    }

    pub fn new_cancel(
        order_id: OrderId,
        owner_id: OwnerId,
        linked_order_id: OrderId,
        timestamp: Timestamp,
    ) -> Self {
        Order {
            order_id,
            owner_id,
            price_ticks: 0,
            qty: 0,
            side: Side::None,
            order_type: OrderType::Cancel,
            timestamp,
            status: OrderStatus::Pending,
            linked_order_id,
        }
    }

    /// Decrement residual quantity by `filled`. Never drives `qty` below zero.
    pub fn reduce_qty(&mut self, filled: Quantity) {
        self.qty -= filled;
        debug_assert!(self.qty >= 0, "order residual quantity went negative");
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Cancelled | OrderStatus::CancelledAfterPartialExecution
        )
    }

    pub fn is_executed(&self) -> bool {
        self.status == OrderStatus::Executed
    }
}
