use crate::core::errors::ExchangeError;
use crate::core::kernel::auth::BearerProvider;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, trace};

/// REST client trait for making HTTP requests
///
/// This trait provides a unified interface for the HTTP operations the
/// exchange API needs: GET with query parameters and form-encoded POST.
/// Authenticated requests carry an OAuth2 bearer token supplied by the
/// configured [`BearerProvider`].
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    /// * `authenticated` - Whether to attach a bearer token
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a GET request with strongly-typed response
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError>;

    /// Make a form-encoded POST request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `form` - Form fields as key-value pairs
    /// * `authenticated` - Whether to attach a bearer token
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a form-encoded POST request with strongly-typed response
    async fn post_form_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: "korbitx/0.1".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    bearer: Option<Arc<dyn BearerProvider>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            bearer: None,
        }
    }

    /// Set the token provider for authenticated requests
    pub fn with_bearer_provider(mut self, bearer: Arc<dyn BearerProvider>) -> Self {
        self.bearer = Some(bearer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            bearer: self.bearer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    bearer: Option<Arc<dyn BearerProvider>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_bearer", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Create a new `ReqwestRest` instance with default settings
    pub fn new(
        base_url: String,
        exchange_name: String,
        bearer: Option<Arc<dyn BearerProvider>>,
    ) -> Result<Self, ExchangeError> {
        let config = RestClientConfig::new(base_url, exchange_name);
        let mut builder = RestClientBuilder::new(config);
        if let Some(bearer) = bearer {
            builder = builder.with_bearer_provider(bearer);
        }
        builder.build()
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Handle the response and extract JSON
    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
            })
        } else {
            Err(ExchangeError::ApiError {
                code: i32::from(status.as_u16()),
                message: response_text,
            })
        }
    }

    /// Make a request with the given parameters
    #[instrument(skip(self, form), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        form: Option<&[(&str, &str)]>,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.request(method, &url);

        for (key, value) in query_params {
            request = request.query(&[(key, value)]);
        }

        if let Some(form) = form {
            request = request.form(form);
        }

        if authenticated {
            let bearer = self.bearer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "Authentication required but no token provider configured".to_string(),
                )
            })?;
            let token = bearer.bearer_token().await?;
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        self.handle_response(response).await
    }

    fn deserialize<T: DeserializeOwned>(value: Value) -> Result<T, ExchangeError> {
        serde_json::from_value(value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
        })
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, None, authenticated)
            .await
    }

    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, None, authenticated)
            .await
            .and_then(Self::deserialize)
    }

    #[instrument(skip(self, form), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::POST, endpoint, &[], Some(form), authenticated)
            .await
    }

    #[instrument(skip(self, form), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn post_form_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.make_request(Method::POST, endpoint, &[], Some(form), authenticated)
            .await
            .and_then(Self::deserialize)
    }
}
