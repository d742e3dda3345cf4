//! Types for private REST API endpoints.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::KorbitError;
use crate::rest::client::Form;
use crate::types::serde_helpers::{int_or_string, optional_int_or_string};
use crate::types::{
    Currency, CurrencyPair, OrderKind, ResponseStatus, Side, TransactionCategory, TransactionType,
    WalletShape,
};

// ============================================================================
// Orders
// ============================================================================

/// Arguments for placing a buy or sell order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderArgs {
    /// Market to trade.
    pub currency_pair: CurrencyPair,
    /// Limit or market.
    pub kind: OrderKind,
    /// Limit price in KRW (ignored by the exchange for market orders).
    pub price: u64,
    /// Amount of coin to trade.
    pub coin_amount: Option<Decimal>,
    /// Amount of KRW to spend (market buys only).
    pub fiat_amount: Option<Decimal>,
}

impl OrderArgs {
    /// A limit order for `coin_amount` at `price`.
    pub fn limit(currency_pair: CurrencyPair, price: u64, coin_amount: Decimal) -> Self {
        Self {
            currency_pair,
            kind: OrderKind::Limit,
            price,
            coin_amount: Some(coin_amount),
            fiat_amount: None,
        }
    }

    /// A market buy spending `fiat_amount` KRW.
    pub fn market_buy(currency_pair: CurrencyPair, fiat_amount: Decimal) -> Self {
        Self {
            currency_pair,
            kind: OrderKind::Market,
            price: 0,
            coin_amount: None,
            fiat_amount: Some(fiat_amount),
        }
    }

    /// A market sell of `coin_amount`.
    pub fn market_sell(currency_pair: CurrencyPair, coin_amount: Decimal) -> Self {
        Self {
            currency_pair,
            kind: OrderKind::Market,
            price: 0,
            coin_amount: Some(coin_amount),
            fiat_amount: None,
        }
    }

    /// Build order arguments from wire text, rejecting unknown pairs and kinds.
    pub fn parse(
        currency_pair: &str,
        kind: &str,
        price: u64,
        coin_amount: Option<Decimal>,
        fiat_amount: Option<Decimal>,
    ) -> Result<Self, KorbitError> {
        Ok(Self {
            currency_pair: currency_pair.parse()?,
            kind: kind.parse()?,
            price,
            coin_amount,
            fiat_amount,
        })
    }

    /// Check that the amounts required by the kind and side are present.
    pub fn validate(&self, side: Side) -> Result<(), KorbitError> {
        match (self.kind, side) {
            (OrderKind::Limit, _) => {
                if self.price == 0 {
                    return Err(KorbitError::validation("limit orders need a price"));
                }
                if self.coin_amount.is_none() {
                    return Err(KorbitError::validation("limit orders need a coin amount"));
                }
            }
            (OrderKind::Market, Side::Buy) => {
                if self.fiat_amount.is_none() {
                    return Err(KorbitError::validation("market buys need a fiat amount"));
                }
            }
            (OrderKind::Market, Side::Sell) => {
                if self.coin_amount.is_none() {
                    return Err(KorbitError::validation("market sells need a coin amount"));
                }
            }
        }
        Ok(())
    }

    /// Form fields for the order endpoint (the nonce is added by the client).
    pub(crate) fn form(&self, side: Side) -> Form {
        let mut form = vec![
            ("currency_pair", self.currency_pair.to_string()),
            ("type", self.kind.to_string()),
            ("price", self.price.to_string()),
        ];
        if let Some(coin_amount) = self.coin_amount {
            form.push(("coin_amount", coin_amount.to_string()));
        }
        if let (Side::Buy, Some(fiat_amount)) = (side, self.fiat_amount) {
            form.push(("fiat_amount", fiat_amount.to_string()));
        }
        form
    }
}

/// Order response body as sent by the exchange.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOrderResponse {
    #[serde(
        rename = "orderId",
        deserialize_with = "optional_int_or_string::deserialize",
        default
    )]
    pub order_id: Option<u64>,
    pub status: ResponseStatus,
}

/// Result of a buy or sell.
///
/// Pair, side, kind and price come from the request, not the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResult {
    /// Exchange-assigned id (absent when the order was refused).
    pub order_id: Option<u64>,
    /// Status reported by the exchange.
    pub status: ResponseStatus,
    /// Market the order was placed on.
    pub currency_pair: CurrencyPair,
    /// Buy or sell.
    pub side: Side,
    /// Requested price.
    pub price: u64,
    /// Requested kind.
    pub kind: OrderKind,
}

impl OrderResult {
    pub(crate) fn enrich(raw: RawOrderResponse, args: &OrderArgs, side: Side) -> Self {
        Self {
            order_id: raw.order_id,
            status: raw.status,
            currency_pair: args.currency_pair,
            side,
            price: args.price,
            kind: args.kind,
        }
    }

    /// Turn a non-success status into [`KorbitError::Rejected`].
    pub(crate) fn into_result(self) -> Result<Self, KorbitError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(KorbitError::Rejected {
                status: self.status.clone(),
                order: Box::new(self),
            })
        }
    }
}

/// Outcome of cancelling a single order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CancelResult {
    /// Id of the order the cancellation refers to.
    #[serde(rename = "orderId", deserialize_with = "int_or_string::deserialize")]
    pub order_id: u64,
    /// Status of this cancellation.
    pub status: ResponseStatus,
    /// Market of the order, when echoed.
    #[serde(default)]
    pub currency_pair: Option<CurrencyPair>,
}

impl CancelResult {
    /// Check if this order was cancelled.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// An order resting on the book.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenOrder {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Order id.
    #[serde(deserialize_with = "int_or_string::deserialize")]
    pub id: u64,
    /// Bid or ask.
    #[serde(rename = "type")]
    pub side: Side,
    /// Limit price.
    pub price: Amount,
    /// Original order size.
    pub total: Amount,
    /// Size still open.
    pub open: Amount,
}

// ============================================================================
// Transactions
// ============================================================================

/// An amount tagged with its currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    /// Currency code.
    pub currency: Currency,
    /// Value in that currency.
    pub value: Decimal,
}

/// Query for the transaction history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionHistoryRequest {
    /// Market to query.
    pub currency_pair: CurrencyPair,
    /// Record category.
    pub category: TransactionCategory,
    /// Number of records to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Maximum number of records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Restrict to fills of this order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
}

impl TransactionHistoryRequest {
    /// Create a request with the required fields.
    pub fn new(currency_pair: CurrencyPair, category: TransactionCategory) -> Self {
        Self {
            currency_pair,
            category,
            offset: None,
            limit: None,
            order_id: None,
        }
    }

    /// Build a request from wire text, rejecting empty or unknown values.
    pub fn parse(currency_pair: &str, category: &str) -> Result<Self, KorbitError> {
        if currency_pair.is_empty() {
            return Err(KorbitError::validation("coin must be specified"));
        }
        Ok(Self::new(currency_pair.parse()?, category.parse()?))
    }

    /// Skip the first `offset` records.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` records.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only return fills of `order_id`.
    pub fn order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

/// A transaction history record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Completion time in milliseconds.
    #[serde(default)]
    pub completed_at: Option<i64>,
    /// Record id (quoted for some pairs, bare for others).
    #[serde(deserialize_with = "int_or_string::deserialize")]
    pub id: u64,
    /// Buy, sell or another record type.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Fee charged.
    #[serde(default)]
    pub fee: Option<Amount>,
    /// Balances after the transaction.
    #[serde(default)]
    pub balances: Vec<Amount>,
    /// Fill details (fills only).
    #[serde(default)]
    pub fills_detail: Option<FillDetail>,
}

/// Details of an order fill.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FillDetail {
    /// Fill price.
    pub price: Amount,
    /// Filled coin amount.
    pub amount: Amount,
    /// Filled value in KRW.
    pub native_amount: Amount,
    /// Order that produced the fill.
    #[serde(
        rename = "orderId",
        alias = "orderID",
        deserialize_with = "int_or_string::deserialize"
    )]
    pub order_id: u64,
}

/// Totals of buy and sell fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuySellSummary {
    /// Sum of KRW spent on buys.
    pub buys: Decimal,
    /// Sum of KRW received from sells.
    pub sells: Decimal,
    /// Number of buy and sell fills counted.
    pub trades: usize,
}

/// Select the records matching `order_size` (when given) inside `[from, to]`.
///
/// Returns a new vector; `records` is left untouched.
pub fn filter_transactions<'a>(
    records: &'a [TransactionRecord],
    order_size: Option<Decimal>,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Vec<&'a TransactionRecord> {
    let from_ms = unix_millis(from);
    let to_ms = unix_millis(to);
    records
        .iter()
        .filter(|record| match order_size {
            Some(size) => record
                .fills_detail
                .as_ref()
                .is_some_and(|fill| fill.amount.value == size),
            None => true,
        })
        .filter(|record| (from_ms..=to_ms).contains(&record.timestamp))
        .collect()
}

/// Sum the KRW value of buy and sell fills after filtering.
pub fn total_buy_sell_history(
    records: &[TransactionRecord],
    order_size: Option<Decimal>,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> BuySellSummary {
    let mut summary = BuySellSummary::default();
    for record in filter_transactions(records, order_size, from, to) {
        let Some(fill) = &record.fills_detail else {
            continue;
        };
        match record.kind {
            TransactionType::Buy => summary.buys += fill.native_amount.value,
            TransactionType::Sell => summary.sells += fill.native_amount.value,
            TransactionType::Other(_) => continue,
        }
        summary.trades += 1;
    }
    summary
}

fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

// ============================================================================
// Wallets
// ============================================================================

/// Bank or coin account linked to the primary wallet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccount {
    /// Currency of the account.
    pub currency: Currency,
    /// Registration status.
    #[serde(default)]
    pub status: Option<String>,
    /// Registered owner name.
    #[serde(default)]
    pub registered_owner: Option<String>,
    /// Account location.
    #[serde(default)]
    pub address: Option<AccountAddress>,
}

/// Location of a connected account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountAddress {
    /// Bank name (fiat accounts).
    #[serde(default)]
    pub bank: Option<String>,
    /// Account number (fiat accounts).
    #[serde(default)]
    pub account: Option<String>,
    /// Coin address (coin accounts).
    #[serde(default)]
    pub address: Option<String>,
}

/// Balances layout returned for the primary (BTC/KRW) pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryWallet {
    /// Deposit accounts.
    #[serde(default, rename = "in")]
    pub deposit_accounts: Vec<ConnectedAccount>,
    /// Withdrawal accounts.
    #[serde(default, rename = "out")]
    pub withdrawal_accounts: Vec<ConnectedAccount>,
    /// Total balance per currency.
    #[serde(default)]
    pub balance: Vec<Amount>,
    /// Amount locked in pending withdrawals.
    #[serde(default)]
    pub pending_out: Vec<Amount>,
    /// Amount locked in open orders.
    #[serde(default)]
    pub pending_orders: Vec<Amount>,
    /// Amount free to trade or withdraw.
    #[serde(default)]
    pub available: Vec<Amount>,
}

/// Balances layout returned for every other pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryWallet {
    /// Total balance per currency.
    #[serde(default)]
    pub balance: Vec<Amount>,
    /// Amount free to trade.
    #[serde(default)]
    pub tradable: Vec<Amount>,
    /// Amount locked in open orders.
    #[serde(default)]
    pub trade_in_use: Vec<Amount>,
}

/// Wallet balances of one pair, in the layout the exchange uses for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Wallet {
    /// BTC/KRW layout with connected accounts.
    Primary(PrimaryWallet),
    /// Layout of the other pairs.
    Secondary(SecondaryWallet),
}

fn value_of(amounts: &[Amount], currency: &Currency) -> Option<Decimal> {
    amounts
        .iter()
        .find(|amount| &amount.currency == currency)
        .map(|amount| amount.value)
}

impl Wallet {
    /// Layout of this wallet.
    pub fn shape(&self) -> WalletShape {
        match self {
            Wallet::Primary(_) => WalletShape::Primary,
            Wallet::Secondary(_) => WalletShape::Secondary,
        }
    }

    /// Total balance of `currency`.
    pub fn balance(&self, currency: &Currency) -> Option<Decimal> {
        match self {
            Wallet::Primary(wallet) => value_of(&wallet.balance, currency),
            Wallet::Secondary(wallet) => value_of(&wallet.balance, currency),
        }
    }

    /// Amount of `currency` free to use.
    pub fn available(&self, currency: &Currency) -> Option<Decimal> {
        match self {
            Wallet::Primary(wallet) => value_of(&wallet.available, currency),
            Wallet::Secondary(wallet) => value_of(&wallet.tradable, currency),
        }
    }

    /// Amount of `currency` locked in open orders.
    pub fn in_trade(&self, currency: &Currency) -> Option<Decimal> {
        match self {
            Wallet::Primary(wallet) => value_of(&wallet.pending_orders, currency),
            Wallet::Secondary(wallet) => value_of(&wallet.trade_in_use, currency),
        }
    }

    /// Amount of `currency` locked in pending withdrawals.
    ///
    /// Only the primary layout reports this.
    pub fn pending_withdrawal(&self, currency: &Currency) -> Option<Decimal> {
        match self {
            Wallet::Primary(wallet) => value_of(&wallet.pending_out, currency),
            Wallet::Secondary(_) => None,
        }
    }
}

/// Coin and KRW balance of one pair's wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinBalance {
    /// Balance of the traded coin.
    pub coins: Decimal,
    /// Balance of KRW.
    pub krw: Decimal,
}

/// Wallets of every queried pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wallets {
    wallets: BTreeMap<CurrencyPair, Wallet>,
}

impl Wallets {
    pub(crate) fn insert(&mut self, pair: CurrencyPair, wallet: Wallet) {
        self.wallets.insert(pair, wallet);
    }

    /// Wallet of `pair`, if it was queried.
    pub fn get(&self, pair: CurrencyPair) -> Option<&Wallet> {
        self.wallets.get(&pair)
    }

    /// Iterate over the queried pairs and their wallets.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyPair, &Wallet)> {
        self.wallets.iter()
    }

    /// Number of wallets.
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Check if no wallet was collected.
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Coin and KRW balance for `pair`. Missing currencies count as zero.
    pub fn coin_balance(&self, pair: CurrencyPair) -> Option<CoinBalance> {
        let wallet = self.get(pair)?;
        Some(CoinBalance {
            coins: wallet.balance(&pair.coin()).unwrap_or_default(),
            krw: wallet.balance(&pair.fiat()).unwrap_or_default(),
        })
    }
}
