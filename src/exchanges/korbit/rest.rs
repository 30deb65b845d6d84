use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::TradeInterval;
use crate::exchanges::korbit::types::{
    KorbitBalances, KorbitCancelAck, KorbitOrder, KorbitOrderAck, KorbitTicker, KorbitTransaction,
    KorbitVolumes,
};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Strictly increasing nonce for authenticated order endpoints.
///
/// Korbit nonces are unix seconds; the counter bumps past the previous value
/// when the clock has not advanced between calls.
#[derive(Debug, Default)]
pub(crate) struct Nonce {
    last: AtomicI64,
}

impl Nonce {
    pub(crate) fn next(&self) -> i64 {
        let now = Utc::now().timestamp();
        let mut next = now;
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                next = now.max(prev + 1);
                Some(next)
            });
        next
    }
}

/// Thin typed wrapper around `RestClient` for the Korbit API
#[derive(Clone)]
pub struct KorbitRestClient<R: RestClient> {
    client: R,
    nonce: Arc<Nonce>,
}

impl<R: RestClient> KorbitRestClient<R> {
    pub fn new(client: R) -> Self {
        Self {
            client,
            nonce: Arc::new(Nonce::default()),
        }
    }

    /// Get the detailed ticker for a currency pair (public)
    pub async fn ticker_detailed(&self, pair: &str) -> Result<KorbitTicker, ExchangeError> {
        self.client
            .get_json("/v1/ticker/detailed", &[("currency_pair", pair)], false)
            .await
    }

    /// Get public trade history for a currency pair over the given window
    pub async fn transactions(
        &self,
        pair: &str,
        interval: TradeInterval,
    ) -> Result<Vec<KorbitTransaction>, ExchangeError> {
        self.client
            .get_json(
                "/v1/transactions",
                &[("currency_pair", pair), ("time", interval.as_str())],
                false,
            )
            .await
    }

    /// Get 30-day trading volume and fee rates per pair
    pub async fn volume(&self) -> Result<KorbitVolumes, ExchangeError> {
        self.client.get_json("/v1/user/volume", &[], true).await
    }

    /// Get per-asset balances
    pub async fn balances(&self) -> Result<KorbitBalances, ExchangeError> {
        self.client.get_json("/v1/user/balances", &[], true).await
    }

    /// Query orders by id for a currency pair
    pub async fn open_orders(
        &self,
        pair: &str,
        id: &str,
    ) -> Result<Vec<KorbitOrder>, ExchangeError> {
        self.client
            .get_json(
                "/v1/user/orders",
                &[("currency_pair", pair), ("id", id)],
                true,
            )
            .await
    }

    /// Place a limit buy order
    pub async fn place_buy(
        &self,
        pair: &str,
        amount: &str,
        price: &str,
    ) -> Result<KorbitOrderAck, ExchangeError> {
        self.place_order("/v1/user/orders/buy", pair, amount, price).await
    }

    /// Place a limit sell order
    pub async fn place_sell(
        &self,
        pair: &str,
        amount: &str,
        price: &str,
    ) -> Result<KorbitOrderAck, ExchangeError> {
        self.place_order("/v1/user/orders/sell", pair, amount, price)
            .await
    }

    async fn place_order(
        &self,
        endpoint: &str,
        pair: &str,
        amount: &str,
        price: &str,
    ) -> Result<KorbitOrderAck, ExchangeError> {
        let nonce = self.nonce.next().to_string();
        let form = [
            ("currency_pair", pair),
            ("type", "limit"),
            ("price", price),
            ("coin_amount", amount),
            ("nonce", nonce.as_str()),
        ];
        self.client.post_form_json(endpoint, &form, true).await
    }

    /// Cancel an order by id
    pub async fn cancel_order(
        &self,
        pair: &str,
        id: &str,
    ) -> Result<Vec<KorbitCancelAck>, ExchangeError> {
        let nonce = self.nonce.next().to_string();
        let form = [
            ("currency_pair", pair),
            ("id", id),
            ("nonce", nonce.as_str()),
        ];
        self.client
            .post_form_json("/v1/user/orders/cancel", &form, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_strictly_increasing() {
        let nonce = Nonce::default();
        let mut prev = nonce.next();
        for _ in 0..100 {
            let next = nonce.next();
            assert!(next > prev, "nonce went from {} to {}", prev, next);
            prev = next;
        }
    }

    #[test]
    fn nonce_starts_at_current_unix_time() {
        let nonce = Nonce::default();
        let now = Utc::now().timestamp();
        let first = nonce.next();
        assert!((first - now).abs() <= 1);
    }
}
