use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{BearerProvider, RestClient};
use crate::exchanges::korbit::types::KorbitTokenResponse;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const TOKEN_ENDPOINT: &str = "/v1/oauth2/access_token";

/// A token is treated as expired this long before its actual expiry so it is
/// never presented in its final moment.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    fn valid_token(&self) -> Option<&str> {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(expires_at)) if expires_at > Utc::now() => Some(token),
            _ => None,
        }
    }

    fn store(&mut self, token: KorbitTokenResponse) {
        let lifetime = Duration::seconds((token.expires_in - EXPIRY_MARGIN_SECS).max(0));
        self.expires_at = Some(Utc::now() + lifetime);
        self.access_token = Some(token.access_token);
        // Korbit rotates the refresh token on every grant
        if token.refresh_token.is_some() {
            self.refresh_token = token.refresh_token;
        }
    }
}

/// OAuth2 token manager for the Korbit API
///
/// Acquires an access token with the password grant on first use, reuses it
/// while valid, and refreshes it with the refresh_token grant once expired.
/// A rejected refresh token (401) clears all token state and falls back to
/// the password grant.
pub struct KorbitAuth<R: RestClient> {
    rest: R,
    config: ExchangeConfig,
    state: Mutex<TokenState>,
}

impl<R: RestClient> KorbitAuth<R> {
    /// Create a new token manager over an unauthenticated REST client
    pub fn new(rest: R, config: ExchangeConfig) -> Self {
        Self {
            rest,
            config,
            state: Mutex::new(TokenState::default()),
        }
    }

    async fn password_grant(&self) -> Result<KorbitTokenResponse, ExchangeError> {
        info!(exchange = "korbit", "requesting access token");
        let form = [
            ("client_id", self.config.api_key()),
            ("client_secret", self.config.secret_key()),
            ("username", self.config.username()),
            ("password", self.config.passphrase()),
            ("grant_type", "password"),
        ];
        let token: KorbitTokenResponse =
            self.rest.post_form_json(TOKEN_ENDPOINT, &form, false).await?;
        debug!(expires_in = token.expires_in, "access token granted");
        Ok(token)
    }

    async fn refresh_grant(
        &self,
        refresh_token: &str,
    ) -> Result<KorbitTokenResponse, ExchangeError> {
        info!(exchange = "korbit", "refreshing access token");
        let form = [
            ("client_id", self.config.api_key()),
            ("client_secret", self.config.secret_key()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let token: KorbitTokenResponse =
            self.rest.post_form_json(TOKEN_ENDPOINT, &form, false).await?;
        debug!(expires_in = token.expires_in, "access token refreshed");
        Ok(token)
    }
}

#[async_trait]
impl<R: RestClient> BearerProvider for KorbitAuth<R> {
    async fn bearer_token(&self) -> Result<String, ExchangeError> {
        if !self.config.has_credentials() {
            return Err(ExchangeError::AuthError(
                "API credentials required".to_string(),
            ));
        }

        let mut state = self.state.lock().await;

        if let Some(token) = state.valid_token() {
            return Ok(token.to_string());
        }

        let token = if let Some(refresh_token) = state.refresh_token.clone() {
            match self.refresh_grant(&refresh_token).await {
                Ok(token) => token,
                Err(err) if err.is_unauthorized() => {
                    warn!("refresh token rejected, re-authenticating");
                    *state = TokenState::default();
                    self.password_grant().await?
                }
                Err(err) => return Err(err),
            }
        } else {
            self.password_grant().await?
        };

        state.store(token);
        state
            .access_token
            .clone()
            .ok_or_else(|| ExchangeError::AuthError("token grant returned no token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Scripted REST client: pops one canned response per POST
    struct ScriptedRest {
        responses: StdMutex<Vec<Result<Value, ExchangeError>>>,
        posts: AtomicUsize,
        last_form: StdMutex<Vec<(String, String)>>,
    }

    impl ScriptedRest {
        fn new(responses: Vec<Result<Value, ExchangeError>>) -> Self {
            Self {
                responses: StdMutex::new(responses),
                posts: AtomicUsize::new(0),
                last_form: StdMutex::new(Vec::new()),
            }
        }

        fn post_count(&self) -> usize {
            self.posts.load(Ordering::SeqCst)
        }

        fn last_form_value(&self, key: &str) -> Option<String> {
            self.last_form
                .lock()
                .unwrap()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[async_trait]
    impl RestClient for ScriptedRest {
        async fn get(
            &self,
            _endpoint: &str,
            _query_params: &[(&str, &str)],
            _authenticated: bool,
        ) -> Result<Value, ExchangeError> {
            unimplemented!("token manager only posts")
        }

        async fn get_json<T: serde::de::DeserializeOwned>(
            &self,
            _endpoint: &str,
            _query_params: &[(&str, &str)],
            _authenticated: bool,
        ) -> Result<T, ExchangeError> {
            unimplemented!("token manager only posts")
        }

        async fn post_form(
            &self,
            _endpoint: &str,
            form: &[(&str, &str)],
            _authenticated: bool,
        ) -> Result<Value, ExchangeError> {
            self.posts.fetch_add(1, Ordering::SeqCst);
            *self.last_form.lock().unwrap() = form
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            self.responses.lock().unwrap().remove(0)
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

    fn config() -> ExchangeConfig {
        ExchangeConfig::new(
            "id".to_string(),
            "secret".to_string(),
            "user".to_string(),
            "pass".to_string(),
        )
    }

    fn token_json(access: &str, refresh: &str, expires_in: i64) -> Value {
        json!({
            "token_type": "Bearer",
            "access_token": access,
            "expires_in": expires_in,
            "refresh_token": refresh
        })
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network_call() {
        let rest = ScriptedRest::new(vec![]);
        let auth = KorbitAuth::new(rest, ExchangeConfig::read_only());

        let err = auth.bearer_token().await.unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
        assert_eq!(auth.rest.post_count(), 0);
    }

    #[tokio::test]
    async fn first_call_uses_password_grant_and_caches() {
        let rest = ScriptedRest::new(vec![Ok(token_json("tok-1", "ref-1", 3600))]);
        let auth = KorbitAuth::new(rest, config());

        assert_eq!(auth.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(
            auth.rest.last_form_value("grant_type").as_deref(),
            Some("password")
        );

        // second call is served from cache
        assert_eq!(auth.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(auth.rest.post_count(), 1);
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        // expires_in below the safety margin, so the token is expired on arrival
        let rest = ScriptedRest::new(vec![
            Ok(token_json("tok-1", "ref-1", 30)),
            Ok(token_json("tok-2", "ref-2", 3600)),
        ]);
        let auth = KorbitAuth::new(rest, config());

        assert_eq!(auth.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(auth.bearer_token().await.unwrap(), "tok-2");
        assert_eq!(
            auth.rest.last_form_value("grant_type").as_deref(),
            Some("refresh_token")
        );
        assert_eq!(
            auth.rest.last_form_value("refresh_token").as_deref(),
            Some("ref-1")
        );
    }

    #[tokio::test]
    async fn rejected_refresh_falls_back_to_password_grant() {
        let rest = ScriptedRest::new(vec![
            Ok(token_json("tok-1", "ref-1", 30)),
            Err(ExchangeError::ApiError {
                code: 401,
                message: "invalid_grant".to_string(),
            }),
            Ok(token_json("tok-2", "ref-2", 3600)),
        ]);
        let auth = KorbitAuth::new(rest, config());

        assert_eq!(auth.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(auth.bearer_token().await.unwrap(), "tok-2");
        assert_eq!(auth.rest.post_count(), 3);
        assert_eq!(
            auth.rest.last_form_value("grant_type").as_deref(),
            Some("password")
        );
    }

    #[tokio::test]
    async fn non_auth_refresh_error_propagates() {
        let rest = ScriptedRest::new(vec![
            Ok(token_json("tok-1", "ref-1", 30)),
            Err(ExchangeError::NetworkError("connection reset".to_string())),
        ]);
        let auth = KorbitAuth::new(rest, config());

        assert_eq!(auth.bearer_token().await.unwrap(), "tok-1");
        let err = auth.bearer_token().await.unwrap_err();
        assert!(matches!(err, ExchangeError::NetworkError(_)));
    }
}
