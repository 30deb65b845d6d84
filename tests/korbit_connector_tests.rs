use async_trait::async_trait;
use korbitx::core::config::ExchangeConfig;
use korbitx::core::errors::ExchangeError;
use korbitx::core::kernel::{RestClient, RetryPolicy};
use korbitx::core::traits::{AccountInfo, MarketDataSource, OrderPlacer};
use korbitx::core::types::{OrderId, Price, Quantity};
use korbitx::exchanges::korbit::KorbitConnector;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: &'static str,
    endpoint: String,
    params: Vec<(String, String)>,
    authenticated: bool,
}

#[derive(Default)]
struct MockRestInner {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ExchangeError>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Scripted REST client: each endpoint holds a queue of canned responses
#[derive(Clone, Default)]
struct MockRest(Arc<MockRestInner>);

impl MockRest {
    fn new() -> Self {
        Self::default()
    }

    fn respond(&self, endpoint: &str, response: Value) -> &Self {
        self.0
            .responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(Ok(response));
        self
    }

    fn fail(&self, endpoint: &str, error: ExchangeError) -> &Self {
        self.0
            .responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(Err(error));
        self
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.0.requests.lock().unwrap().clone()
    }

    fn pop_response(&self, endpoint: &str) -> Result<Value, ExchangeError> {
        self.0
            .responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted response for {}", endpoint))
    }

    fn record(
        &self,
        method: &'static str,
        endpoint: &str,
        params: &[(&str, &str)],
        authenticated: bool,
    ) {
        self.0.requests.lock().unwrap().push(RecordedRequest {
            method,
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            authenticated,
        });
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.record("GET", endpoint, query_params, authenticated);
        self.pop_response(endpoint)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let value = self.get(endpoint, query_params, authenticated).await?;
        serde_json::from_value(value)
            .map_err(|e| ExchangeError::DeserializationError(e.to_string()))
    }

    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.record("POST", endpoint, form, authenticated);
        self.pop_response(endpoint)
    }

    async fn post_form_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let value = self.post_form(endpoint, form, authenticated).await?;
        serde_json::from_value(value)
            .map_err(|e| ExchangeError::DeserializationError(e.to_string()))
    }
}

fn test_config() -> ExchangeConfig {
    ExchangeConfig::new(
        "client_id".to_string(),
        "client_secret".to_string(),
        "user".to_string(),
        "pass".to_string(),
    )
}

/// Connector with millisecond retry delays so tests stay fast
fn connector(rest: MockRest) -> KorbitConnector<MockRest> {
    KorbitConnector::with_retry_policies(
        rest,
        &test_config(),
        RetryPolicy::new(Duration::from_millis(1), 3),
        RetryPolicy::new(Duration::from_millis(1), 1),
    )
}

fn param<'a>(request: &'a RecordedRequest, key: &str) -> Option<&'a str> {
    request
        .params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn ticker_maps_bid_and_ask() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/ticker/detailed",
        json!({"timestamp": 1392620400000i64, "last": "569000", "bid": "568000", "ask": "570000"}),
    );

    let ticker = connector(rest.clone()).get_ticker().await.unwrap();
    assert_eq!(ticker.bid, Price::from_str("568000").unwrap());
    assert_eq!(ticker.ask, Price::from_str("570000").unwrap());

    let requests = rest.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(!requests[0].authenticated);
    assert_eq!(param(&requests[0], "currency_pair"), Some("btc_krw"));
}

#[tokio::test]
async fn ticker_retries_after_network_error() {
    let rest = MockRest::new();
    rest.fail(
        "/v1/ticker/detailed",
        ExchangeError::NetworkError("connection reset".to_string()),
    )
    .respond(
        "/v1/ticker/detailed",
        json!({"timestamp": 0, "last": "1", "bid": "2", "ask": "3"}),
    );

    let ticker = connector(rest.clone()).get_ticker().await.unwrap();
    assert_eq!(ticker.ask, Price::from_str("3").unwrap());
    assert_eq!(rest.requests().len(), 2);
}

#[tokio::test]
async fn ticker_gives_up_after_exhausting_retries() {
    let rest = MockRest::new();
    for _ in 0..4 {
        rest.fail(
            "/v1/ticker/detailed",
            ExchangeError::NetworkError("down".to_string()),
        );
    }

    let err = connector(rest.clone()).get_ticker().await.unwrap_err();
    assert!(matches!(err, ExchangeError::NetworkError(_)));
    // initial attempt plus three retries
    assert_eq!(rest.requests().len(), 4);
}

#[tokio::test]
async fn fee_uses_configured_pair() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/volume",
        json!({"btc_krw": {"maker_fee": "0.0008", "taker_fee": "0.002"}}),
    );

    let fee = connector(rest.clone()).get_fee().await.unwrap();
    assert_eq!(fee.to_string(), "0.0008");
    assert!(rest.requests()[0].authenticated);
}

#[tokio::test]
async fn portfolio_lists_available_balances() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/balances",
        json!({
            "krw": {"available": "123000", "trade_in_use": "4000", "withdrawal_in_use": "0"},
            "btc": {"available": "1.5", "trade_in_use": "0", "withdrawal_in_use": "0"},
            "xrp": {"available": "0", "trade_in_use": "0", "withdrawal_in_use": "0"}
        }),
    );

    let portfolio = connector(rest).get_portfolio().await.unwrap();
    let names: Vec<&str> = portfolio.iter().map(|b| b.asset.as_str()).collect();
    assert_eq!(names, vec!["BTC", "KRW", "XRP"]);
    assert_eq!(portfolio[0].amount.to_string(), "1.5");
}

#[tokio::test]
async fn buy_truncates_amount_and_posts_limit_order() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/orders/buy",
        json!({"orderId": 58738, "status": "success", "currencyPair": "btc_krw"}),
    );

    let id = connector(rest.clone())
        .buy(
            Quantity::from_str("0.123456789999").unwrap(),
            Price::from_str("569000").unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(id, OrderId::new("58738"));

    let requests = rest.requests();
    let order = &requests[0];
    assert_eq!(order.method, "POST");
    assert!(order.authenticated);
    assert_eq!(param(order, "type"), Some("limit"));
    assert_eq!(param(order, "coin_amount"), Some("0.12345678"));
    assert_eq!(param(order, "price"), Some("569000"));
    assert!(param(order, "nonce").is_some());
}

#[tokio::test]
async fn rejected_buy_is_retried_then_errors() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/orders/buy",
        json!({"orderId": "", "status": "not_enough_krw"}),
    )
    .respond(
        "/v1/user/orders/buy",
        json!({"orderId": "", "status": "not_enough_krw"}),
    );

    let err = connector(rest.clone())
        .buy(
            Quantity::from_str("1").unwrap(),
            Price::from_str("569000").unwrap(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not_enough_krw"));
    // order placement only retries once
    assert_eq!(rest.requests().len(), 2);
}

#[tokio::test]
async fn order_nonces_increase_across_placements() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/orders/sell",
        json!({"orderId": 1, "status": "success"}),
    )
    .respond(
        "/v1/user/orders/sell",
        json!({"orderId": 2, "status": "success"}),
    );

    let connector = connector(rest.clone());
    let amount = Quantity::from_str("0.01").unwrap();
    let price = Price::from_str("569000").unwrap();
    connector.sell(amount, price).await.unwrap();
    connector.sell(amount, price).await.unwrap();

    let requests = rest.requests();
    let first: i64 = param(&requests[0], "nonce").unwrap().parse().unwrap();
    let second: i64 = param(&requests[1], "nonce").unwrap().parse().unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn get_order_maps_fill_information() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/orders",
        json!([{
            "id": "58738",
            "status": "partially_filled",
            "avg_price": "569500",
            "price": "570000",
            "filled_amount": "0.3",
            "last_filled_at": 1392620400000i64
        }]),
    );

    let fill = connector(rest)
        .get_order(&OrderId::new("58738"))
        .await
        .unwrap();
    assert_eq!(fill.price, Price::from_str("569500").unwrap());
    assert_eq!(fill.amount, Quantity::from_str("0.3").unwrap());
    assert_eq!(
        fill.last_filled_at.unwrap().timestamp_millis(),
        1_392_620_400_000
    );
}

#[tokio::test]
async fn get_order_for_vanished_order_is_empty_fill() {
    let rest = MockRest::new();
    rest.respond("/v1/user/orders", json!([]));

    let fill = connector(rest)
        .get_order(&OrderId::new("gone"))
        .await
        .unwrap();
    assert_eq!(fill.price, Price::from_str("0").unwrap());
    assert!(fill.last_filled_at.is_none());
}

#[tokio::test]
async fn check_order_semantics() {
    let cases = [
        (json!([{"id": "1", "status": "filled"}]), true),
        (json!([{"id": "1", "status": "partially_filled"}]), false),
        (json!([{"id": "1", "status": "unfilled"}]), false),
        (json!([{"id": "1", "status": "weird"}]), false),
        // vanished orders count as filled
        (json!([]), true),
    ];

    for (response, expected) in cases {
        let rest = MockRest::new();
        rest.respond("/v1/user/orders", response.clone());
        let filled = connector(rest)
            .check_order(&OrderId::new("1"))
            .await
            .unwrap();
        assert_eq!(filled, expected, "response: {}", response);
    }
}

#[tokio::test]
async fn cancel_accepts_terminal_statuses() {
    for status in ["success", "already_filled", "already_canceled"] {
        let rest = MockRest::new();
        rest.respond(
            "/v1/user/orders/cancel",
            json!([{"orderId": "1", "status": status}]),
        );
        connector(rest)
            .cancel_order(&OrderId::new("1"))
            .await
            .unwrap();
    }

    // cancel of an order the exchange no longer reports succeeds
    let rest = MockRest::new();
    rest.respond("/v1/user/orders/cancel", json!([]));
    connector(rest)
        .cancel_order(&OrderId::new("1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancel_rejection_is_an_error() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/user/orders/cancel",
        json!([{"orderId": "1", "status": "not_authorized"}]),
    );

    let err = connector(rest.clone())
        .cancel_order(&OrderId::new("1"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not_authorized"));

    let request = &rest.requests()[0];
    assert_eq!(param(request, "id"), Some("1"));
    assert!(param(request, "nonce").is_some());
}

#[tokio::test]
async fn trades_query_day_window_and_filter() {
    let rest = MockRest::new();
    rest.respond(
        "/v1/transactions",
        json!([
            {"timestamp": 3000, "tid": "3", "price": "571000", "amount": "0.3"},
            {"timestamp": 1000, "tid": "1", "price": "569000", "amount": "0.1"},
            {"timestamp": 2000, "tid": "2", "price": "570000", "amount": "0.2"}
        ]),
    );

    let trades = connector(rest.clone()).get_trades(Some(1), false).await.unwrap();
    let tids: Vec<i64> = trades.iter().map(|t| t.tid).collect();
    assert_eq!(tids, vec![2, 3]);

    let request = &rest.requests()[0];
    assert_eq!(param(request, "time"), Some("day"));
    assert_eq!(param(request, "currency_pair"), Some("btc_krw"));
}
