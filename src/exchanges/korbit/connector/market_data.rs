use crate::core::errors::ExchangeError;
use crate::core::kernel::{with_retry, RestClient, RetryPolicy};
use crate::core::traits::MarketDataSource;
use crate::core::types::{Ticker, Trade, TradeInterval};
use crate::exchanges::korbit::converters;
use crate::exchanges::korbit::rest::KorbitRestClient;
use async_trait::async_trait;
use tracing::instrument;

/// Public market data implementation for Korbit
pub struct MarketData<R: RestClient> {
    rest: KorbitRestClient<R>,
    pair: String,
    retry: RetryPolicy,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(rest: KorbitRestClient<R>, pair: String, retry: RetryPolicy) -> Self {
        Self { rest, pair, retry }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair))]
    async fn get_ticker(&self) -> Result<Ticker, ExchangeError> {
        let rest = &self.rest;
        let pair = self.pair.as_str();

        let ticker =
            with_retry("get_ticker", self.retry, move || rest.ticker_detailed(pair)).await?;

        Ok(converters::convert_ticker(&ticker))
    }

    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair))]
    async fn get_trades(
        &self,
        since: Option<i64>,
        descending: bool,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let rest = &self.rest;
        let pair = self.pair.as_str();

        let transactions = with_retry("get_trades", self.retry, move || {
            rest.transactions(pair, TradeInterval::Day)
        })
        .await?;

        Ok(converters::convert_trades(transactions, since, descending))
    }
}
