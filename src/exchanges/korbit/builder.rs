use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    BearerProvider, ReqwestRest, RestClientBuilder, RestClientConfig, RetryPolicy,
};
use crate::exchanges::korbit::auth::KorbitAuth;
use crate::exchanges::korbit::connector::KorbitConnector;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.korbit.co.kr";
const EXCHANGE_NAME: &str = "korbit";

/// Builder for creating Korbit connectors
///
/// Provides a fluent interface for configuring credentials, the traded
/// market, REST timeouts and retry behavior.
pub struct KorbitBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
    retry: RetryPolicy,
    order_retry: RetryPolicy,
}

impl Default for KorbitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KorbitBuilder {
    /// Create a new `KorbitBuilder` with default settings and no credentials
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: 30,
            retry: RetryPolicy::default(),
            order_retry: RetryPolicy::order_placement(),
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set OAuth2 credentials
    pub fn with_credentials(
        mut self,
        api_key: String,
        secret_key: String,
        username: String,
        passphrase: String,
    ) -> Self {
        let base_url = self.config.base_url.clone();
        let asset = self.config.asset.clone();
        let currency = self.config.currency.clone();
        let mut config =
            ExchangeConfig::new(api_key, secret_key, username, passphrase).market(&asset, &currency);
        config.base_url = base_url;
        self.config = config;
        self
    }

    /// Set the traded market
    pub fn with_market(mut self, asset: &str, currency: &str) -> Self {
        self.config = self.config.market(asset, currency);
        self
    }

    /// Set base URL for the REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    /// Set the retry delay and retry count applied to every call
    pub fn with_retry(mut self, delay: Duration, max_retries: usize) -> Self {
        self.retry = RetryPolicy::new(delay, max_retries);
        self
    }

    /// Set the retry policy for order placement specifically
    pub fn with_order_retry(mut self, delay: Duration, max_retries: usize) -> Self {
        self.order_retry = RetryPolicy::new(delay, max_retries);
        self
    }

    /// Build the connector
    pub fn build(self) -> Result<KorbitConnector<ReqwestRest>, ExchangeError> {
        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let rest_config = RestClientConfig::new(base_url.clone(), EXCHANGE_NAME.to_string())
            .with_timeout(self.rest_timeout);

        let mut rest_builder = RestClientBuilder::new(rest_config);

        // The token manager posts to the OAuth2 endpoint through its own
        // unauthenticated client
        if self.config.has_credentials() {
            let token_rest = RestClientBuilder::new(
                RestClientConfig::new(base_url, EXCHANGE_NAME.to_string())
                    .with_timeout(self.rest_timeout),
            )
            .build()?;

            let auth: Arc<dyn BearerProvider> =
                Arc::new(KorbitAuth::new(token_rest, self.config.clone()));
            rest_builder = rest_builder.with_bearer_provider(auth);
        }

        let rest = rest_builder.build()?;

        Ok(KorbitConnector::with_retry_policies(
            rest,
            &self.config,
            self.retry,
            self.order_retry,
        ))
    }
}
