//! Trade: an executed fill record.
//!
//! - The price comes from the maker's (resting) order.
//! - `side` is the taker's (incoming) side.
//! - `timestamp` is the taker's timestamp.

use serde::{Deserialize, Serialize};

use crate::order::{OrderId, PriceTicks, Quantity, Side, Timestamp};

pub type TradeId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub price_ticks: PriceTicks,
    pub qty: Quantity,
    pub side: TradeSide,
    pub timestamp: Timestamp,
}

/// `Trade::side` excludes `Side::None` — a trade always has a taker side of
/// Buy or Sell, never the sideless `Cancel` pseudo-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_u8(self) -> u8 {
        match self {
            TradeSide::Buy => 0,
            TradeSide::Sell => 1,
        }
    }
}

impl TryFrom<Side> for TradeSide {
    type Error = ();

    fn try_from(side: Side) -> Result<Self, Self::Error> {
        match side {
            Side::Buy => Ok(TradeSide::Buy),
            Side::Sell => Ok(TradeSide::Sell),
            Side::None => Err(()),
        }
    }
}
