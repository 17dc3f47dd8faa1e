//! A read-only rollup of book state, built on demand — never stored
//! alongside the live book, since it would otherwise have to be kept in
//! sync with every mutation.

use serde::{Deserialize, Serialize};

use crate::order::{PriceTicks, Quantity, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: PriceTicks,
    pub total_quantity: Quantity,
    pub order_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideSummary {
    pub total_quantity: Quantity,
    pub order_count: u32,
    pub total_notional: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TempoMetrics {
    pub execution_count: u64,
    pub cancel_count: u64,
    pub total_volume_executed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStructureSnapshot {
    pub timestamp: Timestamp,
    pub best_bid: Option<PriceTicks>,
    pub best_ask: Option<PriceTicks>,
    pub spread: Option<PriceTicks>,
    pub mid: Option<PriceTicks>,
    pub bid_summary: SideSummary,
    pub ask_summary: SideSummary,
    pub bid_depths: Vec<LevelInfo>,
    pub ask_depths: Vec<LevelInfo>,
    pub tempo: TempoMetrics,
}
