use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, RetryPolicy};
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{Balance, OrderFill, OrderId, Price, Quantity, Ticker, Trade};
use crate::exchanges::korbit::converters;
use crate::exchanges::korbit::rest::KorbitRestClient;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Korbit connector that composes all sub-trait implementations
pub struct KorbitConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
    pair: String,
}

impl<R: RestClient + Clone + Send + Sync> KorbitConnector<R> {
    /// Create a new Korbit connector with the default retry policies
    pub fn new(rest: R, config: &ExchangeConfig) -> Self {
        Self::with_retry_policies(
            rest,
            config,
            RetryPolicy::default(),
            RetryPolicy::order_placement(),
        )
    }

    /// Create a new Korbit connector with explicit retry policies.
    ///
    /// `retry` wraps every call; `order_retry` replaces it for buy/sell,
    /// where retrying for long risks posting stale orders.
    pub fn with_retry_policies(
        rest: R,
        config: &ExchangeConfig,
        retry: RetryPolicy,
        order_retry: RetryPolicy,
    ) -> Self {
        let pair = converters::to_korbit_pair(&config.asset, &config.currency);
        let rest = KorbitRestClient::new(rest);
        Self {
            market: MarketData::new(rest.clone(), pair.clone(), retry),
            trading: Trading::new(
                rest.clone(),
                pair.clone(),
                config.asset.clone(),
                retry,
                order_retry,
            ),
            account: Account::new(rest, pair.clone(), retry),
            pair,
        }
    }

    /// Currency pair this connector trades, in Korbit notation
    pub fn market_pair(&self) -> &str {
        &self.pair
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> MarketDataSource for KorbitConnector<R> {
    async fn get_ticker(&self) -> Result<Ticker, ExchangeError> {
        self.market.get_ticker().await
    }

    async fn get_trades(
        &self,
        since: Option<i64>,
        descending: bool,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_trades(since, descending).await
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for KorbitConnector<R> {
    async fn get_fee(&self) -> Result<Decimal, ExchangeError> {
        self.account.get_fee().await
    }

    async fn get_portfolio(&self) -> Result<Vec<Balance>, ExchangeError> {
        self.account.get_portfolio().await
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for KorbitConnector<R> {
    async fn buy(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError> {
        self.trading.buy(amount, price).await
    }

    async fn sell(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError> {
        self.trading.sell(amount, price).await
    }

    async fn get_order(&self, id: &OrderId) -> Result<OrderFill, ExchangeError> {
        self.trading.get_order(id).await
    }

    async fn check_order(&self, id: &OrderId) -> Result<bool, ExchangeError> {
        self.trading.check_order(id).await
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<(), ExchangeError> {
        self.trading.cancel_order(id).await
    }
}

impl<R: RestClient + Send + Sync> ExchangeConnector for KorbitConnector<R> {}
