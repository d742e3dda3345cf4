//! Common domain types for the Korbit API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KorbitError;

/// A market traded on Korbit, quoted in KRW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurrencyPair {
    /// Bitcoin / Korean won
    #[serde(rename = "btc_krw")]
    BtcKrw,
    /// Ether / Korean won
    #[serde(rename = "eth_krw")]
    EthKrw,
    /// Ether Classic / Korean won
    #[serde(rename = "etc_krw")]
    EtcKrw,
    /// Ripple / Korean won
    #[serde(rename = "xrp_krw")]
    XrpKrw,
}

/// Pairs queried by default when collecting wallet balances.
///
/// `XrpKrw` is a valid pair but not part of the default set; add it through
/// [`KorbitRestClientBuilder::currency_pairs`](crate::rest::KorbitRestClientBuilder::currency_pairs).
pub const ACTIVE_CURRENCY_PAIRS: [CurrencyPair; 3] =
    [CurrencyPair::BtcKrw, CurrencyPair::EthKrw, CurrencyPair::EtcKrw];

impl CurrencyPair {
    /// Wire name of the pair (e.g. `btc_krw`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyPair::BtcKrw => "btc_krw",
            CurrencyPair::EthKrw => "eth_krw",
            CurrencyPair::EtcKrw => "etc_krw",
            CurrencyPair::XrpKrw => "xrp_krw",
        }
    }

    /// The traded coin.
    pub fn coin(&self) -> Currency {
        match self {
            CurrencyPair::BtcKrw => Currency::Btc,
            CurrencyPair::EthKrw => Currency::Eth,
            CurrencyPair::EtcKrw => Currency::Etc,
            CurrencyPair::XrpKrw => Currency::Xrp,
        }
    }

    /// The quote currency.
    pub fn fiat(&self) -> Currency {
        Currency::Krw
    }

    /// Shape of the balances response for this pair.
    pub fn wallet_shape(&self) -> WalletShape {
        match self {
            CurrencyPair::BtcKrw => WalletShape::Primary,
            CurrencyPair::EthKrw | CurrencyPair::EtcKrw | CurrencyPair::XrpKrw => {
                WalletShape::Secondary
            }
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyPair {
    type Err = KorbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "btc_krw" => Ok(CurrencyPair::BtcKrw),
            "eth_krw" => Ok(CurrencyPair::EthKrw),
            "etc_krw" => Ok(CurrencyPair::EtcKrw),
            "xrp_krw" => Ok(CurrencyPair::XrpKrw),
            other => Err(KorbitError::validation(format!(
                "unrecognized currency pair: {other}"
            ))),
        }
    }
}

/// Which balances layout the exchange returns for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletShape {
    /// Full layout including connected bank/coin accounts.
    Primary,
    /// Reduced layout without connected accounts.
    Secondary,
}

/// A single currency code as it appears in balances and fees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// Korean won
    Krw,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
    /// Ether Classic
    Etc,
    /// Ripple
    Xrp,
    /// A currency code this library does not know about
    Unrecognized(String),
}

impl Currency {
    /// Wire code of the currency (e.g. `krw`).
    pub fn as_str(&self) -> &str {
        match self {
            Currency::Krw => "krw",
            Currency::Btc => "btc",
            Currency::Eth => "eth",
            Currency::Etc => "etc",
            Currency::Xrp => "xrp",
            Currency::Unrecognized(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.as_str() {
            "krw" => Currency::Krw,
            "btc" => Currency::Btc,
            "eth" => Currency::Eth,
            "etc" => Currency::Etc,
            "xrp" => Currency::Xrp,
            _ => Currency::Unrecognized(code),
        }
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order kind accepted by the order endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Rest on the book at the given price
    Limit,
    /// Fill immediately at the best available price
    Market,
}

impl OrderKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Limit => "limit",
            OrderKind::Market => "market",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKind {
    type Err = KorbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "limit" => Ok(OrderKind::Limit),
            "market" => Ok(OrderKind::Market),
            other => Err(KorbitError::validation(format!(
                "unrecognized order kind: {other}"
            ))),
        }
    }
}

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bid
    #[serde(alias = "bid")]
    Buy,
    /// Ask
    #[serde(alias = "ask")]
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Side of the orderbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    /// Resting buy orders
    Bid,
    /// Resting sell orders
    Ask,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => write!(f, "bid"),
            BookSide::Ask => write!(f, "ask"),
        }
    }
}

/// Status string attached to order and cancel results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    /// The request was accepted
    Success,
    /// The price is malformed or outside the allowed tick
    InvalidPrice,
    /// The coin amount is malformed
    InvalidCoinAmount,
    /// The fiat amount is malformed
    InvalidFiatAmount,
    /// The order value is below the exchange minimum
    UnderMinPrice,
    /// Insufficient balance in the named currency
    NotEnoughBalance(Currency),
    /// No order with that id
    NotFound,
    /// The order is being matched and cannot be cancelled right now
    UnderTrade,
    /// The order was already filled
    AlreadyFilled,
    /// The order was already cancelled
    AlreadyCanceled,
    /// A status this library does not know about
    Unrecognized(String),
}

impl ResponseStatus {
    /// Check if the exchange reported success.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

impl From<String> for ResponseStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "success" => ResponseStatus::Success,
            "invalid_price" => ResponseStatus::InvalidPrice,
            "invalid_coin_amount" => ResponseStatus::InvalidCoinAmount,
            "invalid_fiat_amount" => ResponseStatus::InvalidFiatAmount,
            "under_min_price" => ResponseStatus::UnderMinPrice,
            "not_found" => ResponseStatus::NotFound,
            "under_trade" => ResponseStatus::UnderTrade,
            "already_filled" => ResponseStatus::AlreadyFilled,
            "already_canceled" => ResponseStatus::AlreadyCanceled,
            other => match other.strip_prefix("not_enough_") {
                Some(code) => ResponseStatus::NotEnoughBalance(Currency::from(code.to_string())),
                None => ResponseStatus::Unrecognized(other.to_string()),
            },
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Success => write!(f, "success"),
            ResponseStatus::InvalidPrice => write!(f, "invalid_price"),
            ResponseStatus::InvalidCoinAmount => write!(f, "invalid_coin_amount"),
            ResponseStatus::InvalidFiatAmount => write!(f, "invalid_fiat_amount"),
            ResponseStatus::UnderMinPrice => write!(f, "under_min_price"),
            ResponseStatus::NotEnoughBalance(currency) => write!(f, "not_enough_{currency}"),
            ResponseStatus::NotFound => write!(f, "not_found"),
            ResponseStatus::UnderTrade => write!(f, "under_trade"),
            ResponseStatus::AlreadyFilled => write!(f, "already_filled"),
            ResponseStatus::AlreadyCanceled => write!(f, "already_canceled"),
            ResponseStatus::Unrecognized(status) => f.write_str(status),
        }
    }
}

/// Category filter for the transaction history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    /// Order fills
    Fills,
    /// KRW deposits and withdrawals
    Fiats,
    /// Coin deposits and withdrawals
    Coins,
}

impl FromStr for TransactionCategory {
    type Err = KorbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fills" => Ok(TransactionCategory::Fills),
            "fiats" => Ok(TransactionCategory::Fiats),
            "coins" => Ok(TransactionCategory::Coins),
            other => Err(KorbitError::validation(format!(
                "category must be one of 'fills', 'fiats' or 'coins', got {other:?}"
            ))),
        }
    }
}

/// Kind of a transaction history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// A buy fill
    Buy,
    /// A sell fill
    Sell,
    /// Any other record type (deposits, withdrawals, ...)
    Other(String),
}

impl From<String> for TransactionType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "buy" => TransactionType::Buy,
            "sell" => TransactionType::Sell,
            _ => TransactionType::Other(kind),
        }
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Buy => "buy".to_string(),
            TransactionType::Sell => "sell".to_string(),
            TransactionType::Other(kind) => kind,
        }
    }
}
