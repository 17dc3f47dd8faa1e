//! Invariants that must hold across a whole sequence of events, not just a
//! single call. Each test drives a small but nontrivial event sequence and
//! checks a book-wide property rather than one call's return value.

use order_book_engine::engine::MatchingEngine;
use order_book_engine::order::{Order, OrderStatus, Side};
use order_book_engine::stp::StpPolicy;

fn limit(id: u32, owner: u32, price: i32, qty: i32, side: Side, ts: u64) -> Order {
    Order::new_limit(id, owner, price, qty, side, ts)
}

#[test]
fn total_volume_and_execution_count_match_sum_of_fills() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    engine.match_order(limit(1, 1, 100, 10, Side::Sell, 1000));
    engine.match_order(limit(2, 2, 101, 5, Side::Sell, 1001));
    let o3 = engine.match_order(limit(3, 3, 101, 12, Side::Buy, 1002));

    let traded: i32 = o3.trades.iter().map(|t| t.qty).sum();
    assert_eq!(traded, engine.book().total_volume_executed());
    assert_eq!(o3.trades.len() as u64, engine.book().execution_count());
}

#[test]
fn cancel_count_includes_both_user_cancels_and_stp_resting_cancels() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    // STP resting cancel.
    engine.match_order(limit(1, 1, 100, 10, Side::Sell, 1000));
    engine.match_order(limit(2, 1, 100, 10, Side::Buy, 1001));
    assert_eq!(engine.book().cancel_count(), 1);

    // User cancel.
    engine.match_order(limit(3, 2, 90, 10, Side::Buy, 1002));
    engine.match_order(Order::new_cancel(4, 2, 3, 1003));
    assert_eq!(engine.book().cancel_count(), 2);
}

#[test]
fn no_resting_order_ever_has_a_terminal_status() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    engine.match_order(limit(1, 1, 100, 10, Side::Buy, 1000));
    engine.match_order(limit(2, 2, 100, 4, Side::Sell, 1001));

    // order 1 is resting with a partial fill; it must not be terminal.
    assert!(engine.book().exists(1));
}

#[test]
fn round_trip_add_then_cancel_removes_order_and_marks_it_cancelled() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    engine.match_order(limit(1, 1, 100, 10, Side::Buy, 1000));
    assert!(engine.book().exists(1));

    let outcome = engine.match_order(Order::new_cancel(2, 1, 1, 1001));
    assert!(!engine.book().exists(1));
    let cancel_order = outcome.order.unwrap();
    assert_eq!(cancel_order.status, OrderStatus::Executed);
}

#[test]
fn cancelling_a_missing_id_twice_yields_the_same_reason_both_times() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    let first = engine.match_order(Order::new_cancel(1, 1, 999, 1000));
    let second = engine.match_order(Order::new_cancel(2, 1, 999, 1001));
    assert_eq!(first.reason, second.reason);
}

#[test]
fn price_time_priority_is_respected_within_and_across_levels() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    // Worse price enqueued first, better price enqueued second: better price
    // must still be consumed first.
    engine.match_order(limit(1, 1, 101, 5, Side::Sell, 1000));
    engine.match_order(limit(2, 2, 100, 5, Side::Sell, 1001));
    let outcome = engine.match_order(limit(3, 3, 101, 5, Side::Buy, 1002));

    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.trades[0].maker_order_id, 2);
    assert_eq!(outcome.trades[0].price_ticks, 100);
}

#[test]
fn fifo_within_a_single_price_level() {
    let mut engine = MatchingEngine::new(StpPolicy::CancelBoth);
    engine.match_order(limit(1, 1, 100, 5, Side::Sell, 1000));
    engine.match_order(limit(2, 2, 100, 5, Side::Sell, 1001));
    let outcome = engine.match_order(limit(3, 3, 100, 5, Side::Buy, 1002));

    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.trades[0].maker_order_id, 1);
    assert!(engine.book().exists(2));
}
