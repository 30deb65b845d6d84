use crate::core::errors::ExchangeError;
use async_trait::async_trait;

/// Async source of bearer tokens for authenticated requests
///
/// Implementations own the token lifecycle: acquiring a token on first use,
/// reusing it while valid and re-authenticating when it expires. The REST
/// client only ever asks for a token it can put in an `Authorization` header.
#[async_trait]
pub trait BearerProvider: Send + Sync {
    /// Return a currently valid access token
    async fn bearer_token(&self) -> Result<String, ExchangeError>;
}

/// Fixed-token provider for tests and pre-issued tokens
pub struct StaticBearer(String);

impl StaticBearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl BearerProvider for StaticBearer {
    async fn bearer_token(&self) -> Result<String, ExchangeError> {
        Ok(self.0.clone())
    }
}
