use crate::core::errors::ExchangeError;
use crate::core::kernel::{with_retry, RestClient, RetryPolicy};
use crate::core::traits::OrderPlacer;
use crate::core::types::{OrderFill, OrderId, OrderStatus, Price, Quantity};
use crate::exchanges::korbit::converters;
use crate::exchanges::korbit::rest::KorbitRestClient;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Trading implementation for Korbit
pub struct Trading<R: RestClient> {
    rest: KorbitRestClient<R>,
    pair: String,
    asset: String,
    retry: RetryPolicy,
    /// Shorter policy for order placement so stale orders are not re-posted
    /// long after the price moved
    order_retry: RetryPolicy,
}

impl<R: RestClient> Trading<R> {
    pub fn new(
        rest: KorbitRestClient<R>,
        pair: String,
        asset: String,
        retry: RetryPolicy,
        order_retry: RetryPolicy,
    ) -> Self {
        Self {
            rest,
            pair,
            asset,
            retry,
            order_retry,
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair, %amount, %price))]
    async fn buy(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError> {
        let amount = converters::truncate_amount(&self.asset, amount).to_string();
        let price = price.to_string();
        let rest = &self.rest;
        let pair = self.pair.as_str();
        let (amount, price) = (amount.as_str(), price.as_str());

        // A non-success acknowledgement counts as a failed call and is retried
        with_retry("buy", self.order_retry, move || async move {
            let ack = rest.place_buy(pair, amount, price).await?;
            converters::order_id_from_ack(ack, "buy")
        })
        .await
    }

    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair, %amount, %price))]
    async fn sell(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError> {
        let amount = converters::truncate_amount(&self.asset, amount).to_string();
        let price = price.to_string();
        let rest = &self.rest;
        let pair = self.pair.as_str();
        let (amount, price) = (amount.as_str(), price.as_str());

        with_retry("sell", self.order_retry, move || async move {
            let ack = rest.place_sell(pair, amount, price).await?;
            converters::order_id_from_ack(ack, "sell")
        })
        .await
    }

    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair, order_id = %id))]
    async fn get_order(&self, id: &OrderId) -> Result<OrderFill, ExchangeError> {
        let rest = &self.rest;
        let pair = self.pair.as_str();
        let order_id = id.as_str();

        let orders = with_retry("get_order", self.retry, move || {
            rest.open_orders(pair, order_id)
        })
        .await?;

        Ok(converters::convert_order_fill(id, orders.first()))
    }

    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair, order_id = %id))]
    async fn check_order(&self, id: &OrderId) -> Result<bool, ExchangeError> {
        let rest = &self.rest;
        let pair = self.pair.as_str();
        let order_id = id.as_str();

        let orders = with_retry("check_order", self.retry, move || {
            rest.open_orders(pair, order_id)
        })
        .await?;

        match orders.first() {
            None => {
                // The exchange no longer reports the order; treat as filled
                debug!(order_id = %id, "order query returned no result");
                Ok(true)
            }
            Some(order) => Ok(matches!(
                converters::convert_order_status(&order.status),
                OrderStatus::Filled
            )),
        }
    }

    #[instrument(skip(self), fields(exchange = "korbit", pair = %self.pair, order_id = %id))]
    async fn cancel_order(&self, id: &OrderId) -> Result<(), ExchangeError> {
        let rest = &self.rest;
        let pair = self.pair.as_str();
        let order_id = id.as_str();

        let acks = with_retry("cancel_order", self.retry, move || {
            rest.cancel_order(pair, order_id)
        })
        .await?;

        match acks.first() {
            None => {
                debug!(order_id = %id, "cancel returned no result");
                Ok(())
            }
            Some(ack) => match ack.status.as_str() {
                "success" | "already_filled" | "already_canceled" => Ok(()),
                other => Err(ExchangeError::Other(format!(
                    "unable to cancel order: {}",
                    other
                ))),
            },
        }
    }
}
