//! The double-sided price-level book.
//!
//! Two [`BTreeMap`]s hold price levels — `bids` descending by price, `asks`
//! ascending — giving O(log L) best-price access via `BTreeMap::last_key_value`
//! / `first_key_value`. Each level is an intrusive doubly-linked list of
//! orders threaded through a single arena (`slots`), so that a FIFO
//! enqueue/dequeue at a level and an arbitrary-position cancel-by-id are both
//! O(1) once the slot is located — the locator index (`locator`) gives that
//! lookup in O(1) as well. This mirrors the teacher crate's
//! `BTreeMap<price, VecDeque<Order>>` shape, generalized to support O(1)
//! cancel instead of the teacher's linear scan (see DESIGN.md).

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::errors::RejectionReason;
use crate::lifecycle::OrderLifecycle;
use crate::order::{Order, OrderId, OrderType, PriceTicks, Quantity, Side};
use crate::snapshot::{LevelInfo, MarketStructureSnapshot, SideSummary, TempoMetrics};
use crate::validator::OrderValidator;

/// One node in a price level's FIFO list, plus enough bookkeeping
/// (`price`/`side`) to unlink itself without consulting anything else.
struct Slot {
    order: Order,
    price: PriceTicks,
    side: Side,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone, Copy)]
struct PriceLevel {
    head: usize,
    tail: usize,
}

#[derive(Default)]
pub struct LimitOrderBook {
    bids: BTreeMap<PriceTicks, PriceLevel>,
    asks: BTreeMap<PriceTicks, PriceLevel>,
    slots: Vec<Option<Slot>>,
    free_slots: Vec<usize>,
    locator: HashMap<OrderId, usize>,
    execution_count: u64,
    cancel_count: u64,
    total_volume_executed: i64,
}

impl LimitOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn levels(&self, side: Side) -> &BTreeMap<PriceTicks, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
            Side::None => unreachable!("a price level side is always Buy or Sell"),
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut BTreeMap<PriceTicks, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
            Side::None => unreachable!("a price level side is always Buy or Sell"),
        }
    }

    pub fn exists(&self, order_id: OrderId) -> bool {
        self.locator.contains_key(&order_id)
    }

    pub fn best_bid(&self) -> Option<PriceTicks> {
        self.bids.last_key_value().map(|(&p, _)| p)
    }

    pub fn best_ask(&self) -> Option<PriceTicks> {
        self.asks.first_key_value().map(|(&p, _)| p)
    }

    /// Preconditions enforced via `validate_before_adding`; duplicate ids are
    /// rejected separately since duplication is a locator-index concern, not
    /// a property of the order itself.
    pub fn add(&mut self, order: Order) -> RejectionReason {
        let reason = OrderValidator::validate_before_adding(&order);
        if reason != RejectionReason::None {
            return reason;
        }
        if self.exists(order.order_id) {
            return RejectionReason::AddingDuplicateOrder;
        }

        let price = order.price_ticks;
        let side = order.side;
        let order_id = order.order_id;
        let slot_idx = self.alloc_slot(Slot {
            order,
            price,
            side,
            prev: None,
            next: None,
        });

        // End the level borrow before touching `self.slots` below — holding
        // both mutably at once (one via a method call that aliases all of
        // `self`) would not satisfy the borrow checker.
        let existing_tail = {
            let levels = self.levels_mut(side);
            match levels.get_mut(&price) {
                Some(level) => {
                    let old_tail = level.tail;
                    level.tail = slot_idx;
                    Some(old_tail)
                }
                None => {
                    levels.insert(
                        price,
                        PriceLevel {
                            head: slot_idx,
                            tail: slot_idx,
                        },
                    );
                    None
                }
            }
        };
        if let Some(old_tail) = existing_tail {
            self.slots[old_tail].as_mut().unwrap().next = Some(slot_idx);
            self.slots[slot_idx].as_mut().unwrap().prev = Some(old_tail);
        }
        self.locator.insert(order_id, slot_idx);
        debug!(order_id, price, %side_label(side), "order added to book");
        RejectionReason::None
    }

    /// Cancel a resting order by id, unlinking it from its level (deleting
    /// the level if it becomes empty) and marking it terminal via
    /// `OrderLifecycle::after_cancel_resting`.
    pub fn cancel(&mut self, order_id: OrderId) -> RejectionReason {
        let Some(&slot_idx) = self.locator.get(&order_id) else {
            return RejectionReason::OrderToBeCancelledDoesNotExist;
        };

        let (price, side) = {
            let slot = self.slots[slot_idx].as_ref().unwrap();
            let reason = OrderValidator::validate_before_cancelling(&slot.order);
            if reason != RejectionReason::None {
                return reason;
            }
            (slot.price, slot.side)
        };

        if !self.levels(side).contains_key(&price) {
            warn!(order_id, price, "locator pointed at a missing price level");
            return RejectionReason::OrderBookInvariantViolation;
        }

        self.unlink(slot_idx, side, price);

        let slot = self.slots[slot_idx].as_mut().unwrap();
        slot.order.status = OrderLifecycle::after_cancel_resting(slot.order.status);
        self.free_slot(slot_idx);
        self.locator.remove(&order_id);
        debug!(order_id, "order cancelled");
        RejectionReason::None
    }

    /// False for `Cancel` orders and zero-qty orders; true for `Market`
    /// orders whenever the opposite side is non-empty; for `Limit` orders,
    /// true only when the order's price crosses the current opposite best.
    pub fn is_marketable(&self, order: &Order) -> bool {
        if order.qty == 0 {
            return false;
        }
        match order.side {
            Side::Buy => {
                let Some(best_ask) = self.best_ask() else {
                    return false;
                };
                order.order_type == OrderType::Market || order.price_ticks >= best_ask
            }
            Side::Sell => {
                let Some(best_bid) = self.best_bid() else {
                    return false;
                };
                order.order_type == OrderType::Market || order.price_ticks <= best_bid
            }
            Side::None => false,
        }
    }

    /// Head of the opposite side's best level for an order arriving with
    /// `incoming_side`.
    pub fn matched_head(&self, incoming_side: Side) -> Option<&Order> {
        let opposite = opposite_levels(self, incoming_side)?;
        Some(&self.slots[opposite.head].as_ref().unwrap().order)
    }

    pub fn matched_head_mut(&mut self, incoming_side: Side) -> Option<&mut Order> {
        let head_idx = opposite_levels(self, incoming_side)?.head;
        Some(&mut self.slots[head_idx].as_mut().unwrap().order)
    }

    /// Removes the head of the opposite side's best level, erasing the level
    /// if it becomes empty along with the head's locator entry.
    pub fn pop_front(&mut self, incoming_side: Side) {
        let opp_side = incoming_side.opposite();
        let Some(level) = opposite_levels(self, incoming_side) else {
            return;
        };
        let head_idx = level.head;
        let (price, order_id) = {
            let slot = self.slots[head_idx].as_ref().unwrap();
            (slot.price, slot.order.order_id)
        };
        self.unlink(head_idx, opp_side, price);
        self.free_slot(head_idx);
        self.locator.remove(&order_id);
    }

    fn best_price(&self, side: Side) -> Option<PriceTicks> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
            Side::None => None,
        }
    }

    pub fn record_execution(&mut self, qty: Quantity) {
        if qty > 0 {
            self.execution_count += 1;
            self.total_volume_executed += i64::from(qty);
        }
    }

    pub fn record_cancellation(&mut self) {
        self.cancel_count += 1;
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    pub fn cancel_count(&self) -> u64 {
        self.cancel_count
    }

    pub fn total_volume_executed(&self) -> i64 {
        self.total_volume_executed
    }

    /// Materialises a read-only view of the book: best bid/ask, spread/mid,
    /// per-side summaries, and up to `depth_limit` levels per side in
    /// priority order.
    pub fn snapshot(&self, now: crate::order::Timestamp, depth_limit: usize) -> MarketStructureSnapshot {
        let (bid_summary, bid_depths) = self.summarize(Side::Buy, depth_limit);
        let (ask_summary, ask_depths) = self.summarize(Side::Sell, depth_limit);
        let best_bid = self.best_bid();
        let best_ask = self.best_ask();
        let (spread, mid) = match (best_bid, best_ask) {
            (Some(b), Some(a)) => (Some(a - b), Some((b + a) / 2)),
            _ => (None, None),
        };

        MarketStructureSnapshot {
            timestamp: now,
            best_bid,
            best_ask,
            spread,
            mid,
            bid_summary,
            ask_summary,
            bid_depths,
            ask_depths,
            tempo: TempoMetrics {
                execution_count: self.execution_count,
                cancel_count: self.cancel_count,
                total_volume_executed: self.total_volume_executed,
            },
        }
    }

    fn summarize(&self, side: Side, depth_limit: usize) -> (SideSummary, Vec<LevelInfo>) {
        let mut summary = SideSummary::default();
        let mut depths = Vec::new();

        let prices: Vec<PriceTicks> = match side {
            Side::Buy => self.bids.keys().rev().copied().collect(),
            Side::Sell => self.asks.keys().copied().collect(),
            Side::None => Vec::new(),
        };

        for (i, price) in prices.into_iter().enumerate() {
            let level = self.levels(side)[&price];
            let (total_qty, order_count) = self.level_totals(level);
            summary.total_quantity += total_qty;
            summary.order_count += order_count;
            summary.total_notional += i64::from(price) * i64::from(total_qty);

            if i < depth_limit {
                depths.push(LevelInfo {
                    price,
                    total_quantity: total_qty,
                    order_count,
                });
            }
        }

        (summary, depths)
    }

    fn level_totals(&self, level: PriceLevel) -> (Quantity, u32) {
        let mut total_qty = 0;
        let mut count = 0u32;
        let mut cursor = Some(level.head);
        while let Some(idx) = cursor {
            let slot = self.slots[idx].as_ref().unwrap();
            total_qty += slot.order.qty;
            count += 1;
            cursor = slot.next;
        }
        (total_qty, count)
    }

    fn alloc_slot(&mut self, slot: Slot) -> usize {
        if let Some(idx) = self.free_slots.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        }
    }

    fn free_slot(&mut self, idx: usize) {
        self.slots[idx] = None;
        self.free_slots.push(idx);
    }

    /// Unlink slot `idx` from its level's doubly-linked list, deleting the
    /// level from the price map if it becomes empty.
    fn unlink(&mut self, idx: usize, side: Side, price: PriceTicks) {
        let (prev, next) = {
            let slot = self.slots[idx].as_ref().unwrap();
            (slot.prev, slot.next)
        };

        match prev {
            Some(p) => self.slots[p].as_mut().unwrap().next = next,
            None => {
                if let Some(level) = self.levels_mut(side).get_mut(&price) {
                    level.head = next.unwrap_or(level.head);
                }
            }
        }
        match next {
            Some(n) => self.slots[n].as_mut().unwrap().prev = prev,
            None => {
                if let Some(level) = self.levels_mut(side).get_mut(&price) {
                    level.tail = prev.unwrap_or(level.tail);
                }
            }
        }

        if prev.is_none() && next.is_none() {
            self.levels_mut(side).remove(&price);
        }
    }
}

fn opposite_levels(book: &LimitOrderBook, incoming_side: Side) -> Option<PriceLevel> {
    let opp = incoming_side.opposite();
    let price = book.best_price(opp)?;
    book.levels(opp).get(&price).copied()
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
            Side::None => Side::None,
        }
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
        Side::None => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Order;

    fn limit(id: OrderId, owner: u32, price: i32, qty: i32, side: Side) -> Order {
        Order::new_limit(id, owner, price, qty, side, id as u64 * 1000)
    }

    #[test]
    fn add_then_best_bid_ask() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 10, Side::Buy));
        ob.add(limit(2, 1, 105, 5, Side::Sell));
        assert_eq!(ob.best_bid(), Some(100));
        assert_eq!(ob.best_ask(), Some(105));
    }

    #[test]
    fn fifo_within_level() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 4, Side::Sell));
        ob.add(limit(2, 2, 100, 6, Side::Sell));
        let head = ob.matched_head(Side::Buy).unwrap();
        assert_eq!(head.order_id, 1);
    }

    #[test]
    fn cancel_removes_order_and_empties_level() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 10, Side::Buy));
        assert_eq!(ob.cancel(1), RejectionReason::None);
        assert!(!ob.exists(1));
        assert_eq!(ob.best_bid(), None);
    }

    #[test]
    fn cancel_missing_order_is_reported() {
        let mut ob = LimitOrderBook::new();
        assert_eq!(
            ob.cancel(999),
            RejectionReason::OrderToBeCancelledDoesNotExist
        );
    }

    #[test]
    fn cancel_middle_of_level_preserves_neighbors_fifo() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 1, Side::Sell));
        ob.add(limit(2, 2, 100, 1, Side::Sell));
        ob.add(limit(3, 3, 100, 1, Side::Sell));
        assert_eq!(ob.cancel(2), RejectionReason::None);
        assert_eq!(ob.matched_head(Side::Buy).unwrap().order_id, 1);
        ob.pop_front(Side::Buy);
        assert_eq!(ob.matched_head(Side::Buy).unwrap().order_id, 3);
    }

    #[test]
    fn duplicate_add_rejected() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 10, Side::Buy));
        assert_eq!(
            ob.add(limit(1, 2, 100, 5, Side::Buy)),
            RejectionReason::AddingDuplicateOrder
        );
    }

    #[test]
    fn market_order_rejected_from_add() {
        let mut ob = LimitOrderBook::new();
        let m = Order::new_market(1, 1, 10, Side::Buy, 1000);
        assert_eq!(ob.add(m), RejectionReason::AddingMarketOrder);
    }

    #[test]
    fn is_marketable_rules() {
        let mut ob = LimitOrderBook::new();
        let buy = limit(1, 1, 100, 10, Side::Buy);
        assert!(!ob.is_marketable(&buy)); // no asks yet
        ob.add(limit(2, 2, 100, 10, Side::Sell));
        assert!(ob.is_marketable(&buy));
        let low_buy = limit(3, 1, 99, 10, Side::Buy);
        assert!(!ob.is_marketable(&low_buy));
    }

    #[test]
    fn slots_are_reused_after_cancel() {
        let mut ob = LimitOrderBook::new();
        ob.add(limit(1, 1, 100, 10, Side::Buy));
        ob.cancel(1);
        ob.add(limit(2, 2, 100, 5, Side::Buy));
        // The freed slot from order 1 is reused rather than growing the arena.
        assert_eq!(ob.slots.len(), 1);
    }
}
