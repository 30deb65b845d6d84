use crate::core::errors::ExchangeError;
use crate::core::kernel::{with_retry, RestClient, RetryPolicy};
use crate::core::traits::AccountInfo;
use crate::core::types::Balance;
use crate::exchanges::korbit::converters;
use crate::exchanges::korbit::rest::KorbitRestClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::instrument;

/// Account implementation for Korbit
pub struct Account<R: RestClient> {
    rest: KorbitRestClient<R>,
    pair: String,
    retry: RetryPolicy,
}

impl<R: RestClient> Account<R> {
    pub fn new(rest: KorbitRestClient<R>, pair: String, retry: RetryPolicy) -> Self {
        Self { rest, pair, retry }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair))]
    async fn get_fee(&self) -> Result<Decimal, ExchangeError> {
        let rest = &self.rest;
        let volumes = with_retry("get_fee", self.retry, move || rest.volume()).await?;
        converters::maker_fee(&volumes, &self.pair)
    }

    #[instrument(skip(self), fields(exchange = "korbit"))]
    async fn get_portfolio(&self) -> Result<Vec<Balance>, ExchangeError> {
        let rest = &self.rest;
        let balances = with_retry("get_portfolio", self.retry, move || rest.balances()).await?;
        Ok(converters::convert_portfolio(balances))
    }
}
