//! The per-event state machine. `MatchingEngine` owns the book and drives
//! validation, matching, self-trade prevention, and resting/terminal status
//! assignment for one incoming order at a time.

use std::sync::Arc;

use tracing::{error, warn};

use crate::errors::RejectionReason;
use crate::lifecycle::OrderLifecycle;
use crate::order::{Order, OrderStatus, OrderType};
use crate::orderbook::LimitOrderBook;
use crate::stp::StpPolicy;
use crate::trade::{Trade, TradeSide};
use crate::trade_id::TradeIdGenerator;
use crate::trade_log::TradeLogger;
use crate::validator::OrderValidator;

/// What came out of driving one order through the engine: the rejection
/// reason (`None` on success), any trades produced, and the order back —
/// present only when it did not end up resting in the book, since the book
/// owns it otherwise.
pub struct MatchOutcome {
    pub reason: RejectionReason,
    pub trades: Vec<Trade>,
    pub order: Option<Order>,
}

pub struct MatchingEngine {
    book: LimitOrderBook,
    stp_policy: StpPolicy,
    trade_logger: Option<Box<dyn TradeLogger>>,
    trade_id_generator: Option<Arc<dyn TradeIdGenerator>>,
}

impl MatchingEngine {
    pub fn new(stp_policy: StpPolicy) -> Self {
        Self {
            book: LimitOrderBook::new(),
            stp_policy,
            trade_logger: None,
            trade_id_generator: None,
        }
    }

    pub fn with_trade_logger(mut self, logger: Box<dyn TradeLogger>) -> Self {
        self.trade_logger = Some(logger);
        self
    }

    pub fn with_trade_id_generator(mut self, generator: Arc<dyn TradeIdGenerator>) -> Self {
        self.trade_id_generator = Some(generator);
        self
    }

    pub fn book(&self) -> &LimitOrderBook {
        &self.book
    }

    /// Drive `incoming` through validation, matching, self-trade prevention,
    /// and cancel dispatch, exactly per the algorithm this module implements.
    pub fn match_order(&mut self, mut incoming: Order) -> MatchOutcome {
        let mut trades = Vec::new();

        let pre_check = OrderValidator::validate_before_matching(Some(&incoming));
        if pre_check != RejectionReason::None {
            if pre_check != RejectionReason::NullOrder {
                incoming.status = OrderStatus::Cancelled;
            }
            return MatchOutcome {
                reason: pre_check.collapse_to_engine_surface(),
                trades,
                order: Some(incoming),
            };
        }

        if self.book.exists(incoming.order_id) {
            return MatchOutcome {
                reason: RejectionReason::OrderToBeAddedAlreadyExists,
                trades,
                order: Some(incoming),
            };
        }

        let initial_qty = incoming.qty;
        let side = incoming.side;

        while self.book.is_marketable(&incoming) {
            let (resting_owner, resting_initial, resting_price, resting_id) = {
                let resting = self
                    .book
                    .matched_head(side)
                    .expect("is_marketable implies an opposite head exists");
                (resting.owner_id, resting.qty, resting.price_ticks, resting.order_id)
            };

            if resting_owner == incoming.owner_id {
                let decision = self.stp_policy.decide();
                if !decision.cancel_incoming && !decision.cancel_resting {
                    unreachable!("StpPolicy must cancel at least one side of a self-trade");
                }

                if decision.cancel_incoming {
                    incoming.status =
                        OrderLifecycle::after_cancel_incoming(initial_qty, incoming.qty);
                }
                if decision.cancel_resting {
                    if let Some(resting) = self.book.matched_head_mut(side) {
                        resting.status = OrderLifecycle::after_cancel_resting(resting.status);
                    }
                    self.book.pop_front(side);
                    self.book.record_cancellation();
                }

                if incoming.status.is_terminal() {
                    return MatchOutcome {
                        reason: RejectionReason::None,
                        trades,
                        order: Some(incoming),
                    };
                }
                // resting was cancelled; loop again for the next head.
                continue;
            }

            let traded = incoming.qty.min(
                self.book
                    .matched_head(side)
                    .expect("checked above")
                    .qty,
            );
            incoming.reduce_qty(traded);
            if let Some(resting) = self.book.matched_head_mut(side) {
                resting.reduce_qty(traded);
            }
            self.book.record_execution(traded);

            if traded > 0 {
                if let (Some(logger), Some(id_gen)) =
                    (self.trade_logger.as_mut(), self.trade_id_generator.as_ref())
                {
                    let trade_side = TradeSide::try_from(incoming.side)
                        .expect("incoming side is Buy or Sell while marketable");
                    let trade = Trade {
                        trade_id: id_gen.next_id(),
                        taker_order_id: incoming.order_id,
                        maker_order_id: resting_id,
                        price_ticks: resting_price,
                        qty: traded,
                        side: trade_side,
                        timestamp: incoming.timestamp,
                    };
                    if let Err(e) = logger.log(&trade) {
                        error!(error = %e, trade_id = trade.trade_id, "failed to log trade");
                    }
                    trades.push(trade);
                }
            }

            let resting_qty_now = self
                .book
                .matched_head(side)
                .map(|o| o.qty)
                .unwrap_or(0);
            let resting_status =
                OrderLifecycle::after_matching(resting_initial, resting_qty_now, OrderType::Limit);
            if let Some(resting) = self.book.matched_head_mut(side) {
                resting.status = resting_status;
            }
            if resting_qty_now == 0 {
                self.book.pop_front(side);
            }
        }

        if incoming.order_type == OrderType::Cancel {
            let reason = self.book.cancel(incoming.linked_order_id);
            if reason != RejectionReason::None {
                incoming.status = OrderStatus::Cancelled;
                return MatchOutcome {
                    reason: reason.collapse_to_engine_surface(),
                    trades,
                    order: Some(incoming),
                };
            }
            self.book.record_cancellation();
        }

        let final_status =
            OrderLifecycle::after_matching(initial_qty, incoming.qty, incoming.order_type);
        incoming.status = final_status;

        if final_status.is_resting() {
            // Cloned rather than moved: `add` only fails on a logic bug (this
            // order was just validated by the lifecycle it came through), so
            // keeping a copy to hand back on that unreachable-in-practice
            // path outweighs the cost of the clone.
            let reason = self.book.add(incoming.clone());
            if reason != RejectionReason::None {
                warn!(order_id = incoming.order_id, ?reason, "defensive add failed after matching");
                incoming.status = OrderLifecycle::after_cancel_resting(final_status);
                return MatchOutcome {
                    reason: reason.collapse_to_engine_surface(),
                    trades,
                    order: Some(incoming),
                };
            }
            return MatchOutcome {
                reason: RejectionReason::None,
                trades,
                order: None,
            };
        }

        MatchOutcome {
            reason: RejectionReason::None,
            trades,
            order: Some(incoming),
        }
    }
}
