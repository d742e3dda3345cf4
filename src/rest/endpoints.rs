//! Korbit REST API endpoint constants.

/// Base URL for the Korbit REST API.
pub const KORBIT_BASE_URL: &str = "https://api.korbit.co.kr";

/// OAuth2 token endpoint (password and refresh-token grants).
pub const ACCESS_TOKEN: &str = "/v1/oauth2/access_token";

/// Public endpoints (no authentication required).
pub mod public {
    /// Get detailed ticker.
    pub const TICKER_DETAILED: &str = "/v1/ticker/detailed";
    /// Get order book.
    pub const ORDERBOOK: &str = "/v1/orderbook";
}

/// Private endpoints (bearer token required).
pub mod private {
    /// Get wallet balances for a pair.
    pub const BALANCES: &str = "/v1/user/balances";
    /// Place a bid.
    pub const ORDERS_BUY: &str = "/v1/user/orders/buy";
    /// Place an ask.
    pub const ORDERS_SELL: &str = "/v1/user/orders/sell";
    /// Cancel open orders.
    pub const ORDERS_CANCEL: &str = "/v1/user/orders/cancel";
    /// List open orders.
    pub const ORDERS_OPEN: &str = "/v1/user/orders/open";
    /// Get transaction history.
    pub const TRANSACTIONS: &str = "/v1/user/transactions";
}
