use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use korbit_api_client::KorbitError;
use korbit_api_client::auth::{IncreasingNonce, StaticCredentials, Token};
use korbit_api_client::rest::private::{OrderArgs, TransactionHistoryRequest, Wallet};
use korbit_api_client::rest::{KorbitClient, KorbitRestClient};
use korbit_api_client::types::{
    Currency, CurrencyPair, OrderKind, ResponseStatus, Side, TransactionCategory, TransactionType,
    WalletShape,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn credentials() -> Arc<StaticCredentials> {
    Arc::new(StaticCredentials::new(
        "client",
        "client_secret",
        "trader@example.com",
        "hunter2",
    ))
}

fn token() -> Token {
    Token::new("access", "Bearer", 3600, "refresh", OffsetDateTime::now_utc())
}

fn build_client(server: &MockServer) -> KorbitRestClient {
    KorbitRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials())
        .token(token())
        .build()
}

fn form_value(body: &[u8], key: &str) -> Vec<String> {
    url::form_urlencoded::parse(body)
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

fn token_response(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "token_type": "Bearer",
        "access_token": access,
        "expires_in": 3600,
        "refresh_token": refresh
    })
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=client"))
        .and(body_string_contains("username=trader%40example.com"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("a1", "r1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials())
        .build();
    assert!(client.token().await.is_none());

    let token = client.login().await.unwrap();
    assert_eq!(token.expose_access_token(), "a1");
    assert_eq!(token.authorization(), "Bearer a1");
    assert_eq!(token.expires_in, 3600);

    let held = client.token().await.unwrap();
    assert_eq!(held.expose_refresh_token(), "r1");
    assert!(!assert_ok!(client.should_refresh().await));
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response("a2", "r2")))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let token = client.refresh_token().await.unwrap();

    assert_eq!(token.expose_access_token(), "a2");
    assert_eq!(client.token().await.unwrap().expose_refresh_token(), "r2");
}

#[tokio::test]
async fn test_rejected_login_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials())
        .build();
    let err = client.login().await.unwrap_err();

    assert!(matches!(err, KorbitError::Auth(_)));
    assert!(err.is_unauthorized());
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn test_login_without_credentials_fails_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder().base_url(server.uri()).build();
    let err = client.login().await.unwrap_err();

    assert!(matches!(err, KorbitError::Validation(_)));
    assert!(err.is_local());
    assert!(client.refresh_token().await.unwrap_err().is_local());
}

#[tokio::test]
async fn test_refresh_without_token_fails_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials())
        .build();

    assert!(matches!(
        client.refresh_token().await,
        Err(KorbitError::MissingToken)
    ));
    assert!(matches!(
        client.should_refresh().await,
        Err(KorbitError::MissingToken)
    ));
}

#[tokio::test]
async fn test_buy_result_follows_request_not_echo() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/buy"))
        .and(header("Authorization", "Bearer access"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("currency_pair=btc_krw"))
        .and(body_string_contains("type=limit"))
        .and(body_string_contains("price=3000000"))
        .and(body_string_contains("coin_amount=0.01"))
        .and(body_string_contains("nonce="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": "1234",
            "status": "success",
            "currency_pair": "eth_krw"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let args = OrderArgs::limit(CurrencyPair::BtcKrw, 3_000_000, dec("0.01"));
    let order = client.buy(&args).await.unwrap();

    assert_eq!(order.order_id, Some(1234));
    assert_eq!(order.status, ResponseStatus::Success);
    assert_eq!(order.currency_pair, CurrencyPair::BtcKrw);
    assert_eq!(order.side, Side::Buy);
    assert_eq!(order.price, 3_000_000);
    assert_eq!(order.kind, OrderKind::Limit);
}

#[tokio::test]
async fn test_market_sell_reports_kind() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/sell"))
        .and(body_string_contains("type=market"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": 99,
            "status": "success"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let args = OrderArgs::market_sell(CurrencyPair::EthKrw, dec("1.5"));
    let order = KorbitClient::sell(&client, &args).await.unwrap();

    assert_eq!(order.order_id, Some(99));
    assert_eq!(order.kind, OrderKind::Market);
    assert_eq!(order.side, Side::Sell);
}

#[tokio::test]
async fn test_rejected_order_carries_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/buy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "not_enough_krw"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let args = OrderArgs::limit(CurrencyPair::BtcKrw, 3_000_000, dec("10"));
    let err = client.buy(&args).await.unwrap_err();

    match &err {
        KorbitError::Rejected { status, .. } => {
            assert_eq!(*status, ResponseStatus::NotEnoughBalance(Currency::Krw));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let order = err.rejected_order().unwrap();
    assert_eq!(order.order_id, None);
    assert_eq!(order.currency_pair, CurrencyPair::BtcKrw);
}

#[tokio::test]
async fn test_invalid_orders_never_reach_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server);

    let unknown_kind = OrderArgs::parse("btc_krw", "stop", 1000, Some(dec("1")), None);
    assert!(matches!(unknown_kind, Err(KorbitError::Validation(_))));

    let unknown_pair = OrderArgs::parse("doge_krw", "limit", 1000, Some(dec("1")), None);
    assert!(matches!(unknown_pair, Err(KorbitError::Validation(_))));

    let no_price = OrderArgs::limit(CurrencyPair::BtcKrw, 0, dec("1"));
    let err = client.buy(&no_price).await.unwrap_err();
    assert!(err.is_local());

    let no_fiat = OrderArgs::parse("btc_krw", "market", 0, Some(dec("1")), None).unwrap();
    assert_err!(client.buy(&no_fiat).await);

    assert!(matches!(
        client.cancel_open_orders(&[], CurrencyPair::BtcKrw).await,
        Err(KorbitError::Validation(_))
    ));
}

#[tokio::test]
async fn test_private_call_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder().base_url(server.uri()).build();
    let err = client
        .list_open_orders(CurrencyPair::BtcKrw)
        .await
        .unwrap_err();

    assert!(matches!(err, KorbitError::MissingToken));
}

#[tokio::test]
async fn test_nonce_increases_across_writes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/sell"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": "1",
            "status": "success"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder()
        .base_url(server.uri())
        .token(token())
        .nonce_provider(Arc::new(IncreasingNonce::starting_at(500)))
        .build();
    let args = OrderArgs::limit(CurrencyPair::EtcKrw, 20_000, dec("3"));
    for _ in 0..3 {
        client.sell(&args).await.unwrap();
    }

    let nonces: Vec<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .flat_map(|request| form_value(&request.body, "nonce"))
        .map(|nonce| nonce.parse().unwrap())
        .collect();

    assert_eq!(nonces, vec![501, 502, 503]);
}

#[tokio::test]
async fn test_cancel_open_orders_reports_each_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/orders/cancel"))
        .and(body_string_contains("currency_pair=btc_krw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"orderId": "1", "status": "success"},
            {"orderId": "2", "status": "not_found"},
            {"orderId": 3, "status": "success"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let results = client
        .cancel_open_orders(&[1, 2, 3], CurrencyPair::BtcKrw)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().map(|r| r.order_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(results.iter().filter(|r| r.is_success()).count(), 2);
    assert_eq!(results[1].status, ResponseStatus::NotFound);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(form_value(&requests[0].body, "id"), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_list_open_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/user/orders/open"))
        .and(query_param("currency_pair", "eth_krw"))
        .and(header("Authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "timestamp": 1_700_000_000_000_i64,
            "id": "58726",
            "type": "bid",
            "price": {"currency": "krw", "value": "250000"},
            "total": {"currency": "eth", "value": "1.5"},
            "open": {"currency": "eth", "value": "1.0"}
        }])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let orders = client.list_open_orders(CurrencyPair::EthKrw).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, 58726);
    assert_eq!(orders[0].side, Side::Buy);
    assert_eq!(orders[0].open.value, dec("1.0"));
}

#[tokio::test]
async fn test_transaction_history_quoted_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/user/transactions"))
        .and(query_param("currency_pair", "btc_krw"))
        .and(query_param("category", "fills"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "timestamp": 1_700_000_000_000_i64,
            "completedAt": 1_700_000_000_500_i64,
            "id": "42",
            "type": "buy",
            "fee": {"currency": "btc", "value": "0.00001"},
            "balances": [
                {"currency": "krw", "value": "950000"},
                {"currency": "btc", "value": "0.01"}
            ],
            "fillsDetail": {
                "price": {"currency": "krw", "value": "5000000"},
                "amount": {"currency": "btc", "value": "0.01"},
                "native_amount": {"currency": "krw", "value": "50000"},
                "orderId": "1001"
            }
        }])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request =
        TransactionHistoryRequest::new(CurrencyPair::BtcKrw, TransactionCategory::Fills).limit(10);
    let records = client.get_transaction_history(&request).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 42);
    assert_eq!(records[0].kind, TransactionType::Buy);
    let fill = records[0].fills_detail.as_ref().unwrap();
    assert_eq!(fill.order_id, 1001);
    assert_eq!(fill.native_amount.value, dec("50000"));
}

#[tokio::test]
async fn test_get_wallets_by_layout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/user/balances"))
        .and(query_param("currency_pair", "btc_krw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "in": [{
                "currency": "krw",
                "address": {"bank": "Shinhan", "account": "110-000-000000"},
                "registeredOwner": "Trader"
            }],
            "out": [],
            "balance": [
                {"currency": "krw", "value": "1000000"},
                {"currency": "btc", "value": "0.5"}
            ],
            "pendingOut": [{"currency": "btc", "value": "0.1"}],
            "pendingOrders": [{"currency": "krw", "value": "200000"}],
            "available": [
                {"currency": "krw", "value": "800000"},
                {"currency": "btc", "value": "0.4"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/user/balances"))
        .and(query_param("currency_pair", "xrp_krw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "balance": [
                {"currency": "krw", "value": "5000"},
                {"currency": "xrp", "value": "300"}
            ],
            "tradable": [{"currency": "xrp", "value": "250"}],
            "tradeInUse": [{"currency": "xrp", "value": "50"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = KorbitRestClient::builder()
        .base_url(server.uri())
        .token(token())
        .currency_pairs([CurrencyPair::BtcKrw, CurrencyPair::XrpKrw])
        .build();
    let wallets = client.get_wallets().await.unwrap();

    assert_eq!(wallets.len(), 2);

    let btc = wallets.get(CurrencyPair::BtcKrw).unwrap();
    assert_eq!(btc.shape(), WalletShape::Primary);
    assert_eq!(btc.available(&Currency::Btc), Some(dec("0.4")));
    assert_eq!(btc.pending_withdrawal(&Currency::Btc), Some(dec("0.1")));
    match btc {
        Wallet::Primary(wallet) => {
            assert_eq!(wallet.deposit_accounts.len(), 1);
            assert_eq!(
                wallet.deposit_accounts[0].registered_owner.as_deref(),
                Some("Trader")
            );
        }
        Wallet::Secondary(_) => panic!("btc_krw should use the primary layout"),
    }

    let xrp = wallets.get(CurrencyPair::XrpKrw).unwrap();
    assert_eq!(xrp.shape(), WalletShape::Secondary);
    assert_eq!(xrp.in_trade(&Currency::Xrp), Some(dec("50")));
    assert_eq!(xrp.pending_withdrawal(&Currency::Xrp), None);

    let balance = wallets.coin_balance(CurrencyPair::XrpKrw).unwrap();
    assert_eq!(balance.coins, dec("300"));
    assert_eq!(balance.krw, dec("5000"));
    assert!(wallets.get(CurrencyPair::EthKrw).is_none());
}

#[tokio::test]
async fn test_get_wallets_aborts_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/user/balances"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.get_wallets().await.unwrap_err();

    assert!(err.is_unauthorized());
}
