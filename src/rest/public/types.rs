//! Types for public REST API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::KorbitError;
use crate::types::BookSide;

/// Detailed ticker for one pair.
///
/// Prices are whole KRW.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Last traded price.
    #[serde_as(as = "DisplayFromStr")]
    pub last: u64,
    /// Best bid.
    #[serde_as(as = "DisplayFromStr")]
    pub bid: u64,
    /// Best ask.
    #[serde_as(as = "DisplayFromStr")]
    pub ask: u64,
    /// Lowest price over the last 24 hours.
    #[serde_as(as = "DisplayFromStr")]
    pub low: u64,
    /// Highest price over the last 24 hours.
    #[serde_as(as = "DisplayFromStr")]
    pub high: u64,
    /// Traded volume over the last 24 hours, in coin.
    pub volume: Decimal,
}

impl Ticker {
    /// Difference between the best ask and the best bid.
    pub fn spread(&self) -> i128 {
        i128::from(self.ask) - i128::from(self.bid)
    }
}

/// Orderbook as sent by the exchange: levels are lists of strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderbook {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Bid levels, best first.
    #[serde(default)]
    pub bids: Vec<Vec<String>>,
    /// Ask levels, best first.
    #[serde(default)]
    pub asks: Vec<Vec<String>>,
}

/// Orderbook with numeric levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Orderbook {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Bid levels in the order the exchange sent them.
    pub bids: Vec<OrderbookEntry>,
    /// Ask levels in the order the exchange sent them.
    pub asks: Vec<OrderbookEntry>,
}

/// A single price level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderbookEntry {
    /// Price in KRW.
    pub price: u64,
    /// Quantity in coin.
    pub quantity: f64,
}

impl RawOrderbook {
    /// Convert every `[price, quantity, ...]` level into an [`OrderbookEntry`].
    ///
    /// Level order is kept as received. Trailing elements after the quantity
    /// (the exchange may append an order count) are ignored.
    pub fn transform(&self) -> Result<Orderbook, KorbitError> {
        Ok(Orderbook {
            timestamp: self.timestamp,
            bids: transform_side(BookSide::Bid, &self.bids)?,
            asks: transform_side(BookSide::Ask, &self.asks)?,
        })
    }
}

impl TryFrom<RawOrderbook> for Orderbook {
    type Error = KorbitError;

    fn try_from(raw: RawOrderbook) -> Result<Self, Self::Error> {
        raw.transform()
    }
}

fn transform_side(side: BookSide, levels: &[Vec<String>]) -> Result<Vec<OrderbookEntry>, KorbitError> {
    levels
        .iter()
        .map(|level| match level.as_slice() {
            [price, quantity, ..] => Ok(OrderbookEntry {
                price: price.parse().map_err(|_| KorbitError::Orderbook {
                    side,
                    field: "price",
                    value: price.clone(),
                })?,
                quantity: quantity.parse().map_err(|_| KorbitError::Orderbook {
                    side,
                    field: "quantity",
                    value: quantity.clone(),
                })?,
            }),
            _ => Err(KorbitError::Orderbook {
                side,
                field: "level",
                value: format!("{level:?}"),
            }),
        })
        .collect()
}

impl Orderbook {
    /// Best (first) bid.
    pub fn best_bid(&self) -> Option<&OrderbookEntry> {
        self.bids.first()
    }

    /// Best (first) ask.
    pub fn best_ask(&self) -> Option<&OrderbookEntry> {
        self.asks.first()
    }
}
