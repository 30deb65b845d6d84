use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Credentials and market selection for a connector.
///
/// Korbit authenticates with OAuth2 password-grant tokens, so four secrets
/// are required: the OAuth2 client id ("key"), client secret ("secret"),
/// account username and account password ("passphrase").
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub username: Secret<String>,
    pub passphrase: Secret<String>,
    /// Base asset, e.g. "btc".
    pub asset: String,
    /// Quote currency, e.g. "krw".
    pub currency: String,
    pub base_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("username", "[REDACTED]")?;
        state.serialize_field("passphrase", "[REDACTED]")?;
        state.serialize_field("asset", &self.asset)?;
        state.serialize_field("currency", &self.currency)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            username: String,
            passphrase: String,
            asset: String,
            currency: String,
            base_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            username: Secret::new(helper.username),
            passphrase: Secret::new(helper.passphrase),
            asset: helper.asset,
            currency: helper.currency,
            base_url: helper.base_url,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with OAuth2 credentials.
    ///
    /// The traded market defaults to btc/krw; override with [`Self::market`].
    #[must_use]
    pub fn new(
        api_key: String,
        secret_key: String,
        username: String,
        passphrase: String,
    ) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            username: Secret::new(username),
            passphrase: Secret::new(passphrase),
            asset: "btc".to_string(),
            currency: "krw".to_string(),
            base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_KEY` (e.g., `KORBIT_KEY`) - OAuth2 client id
    /// - `{PREFIX}_SECRET` - OAuth2 client secret
    /// - `{PREFIX}_USERNAME`
    /// - `{PREFIX}_PASSPHRASE` - account password
    /// - `{PREFIX}_ASSET` (optional, defaults to "btc")
    /// - `{PREFIX}_CURRENCY` (optional, defaults to "krw")
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let require = |suffix: &str| -> Result<String, ConfigError> {
            let var = format!("{}_{}", prefix, suffix);
            env::var(&var).map_err(|_| ConfigError::MissingEnvironmentVariable(var))
        };

        let api_key = require("KEY")?;
        let secret_key = require("SECRET")?;
        let username = require("USERNAME")?;
        let passphrase = require("PASSPHRASE")?;

        let asset = env::var(format!("{}_ASSET", prefix)).unwrap_or_else(|_| "btc".to_string());
        let currency =
            env::var(format!("{}_CURRENCY", prefix)).unwrap_or_else(|_| "krw".to_string());
        let base_url = env::var(format!("{}_BASE_URL", prefix)).ok();

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            username: Secret::new(username),
            passphrase: Secret::new(passphrase),
            asset: asset.to_lowercase(),
            currency: currency.to_lowercase(),
            base_url,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// This method first loads environment variables from a .env file (if it
    /// exists), then reads the configuration using the standard environment
    /// variable names.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    /// Add .env to your .gitignore file.
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Create configuration for public endpoints only (ticker, trade history).
    /// Authenticated operations will fail with an auth error.
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        )
    }

    /// Check if this configuration has the full credential set required for
    /// authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
            && !self.secret_key.expose_secret().is_empty()
            && !self.username.expose_secret().is_empty()
            && !self.passphrase.expose_secret().is_empty()
    }

    /// Set the traded market
    #[must_use]
    pub fn market(mut self, asset: &str, currency: &str) -> Self {
        self.asset = asset.to_lowercase();
        self.currency = currency.to_lowercase();
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Get OAuth2 client id (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get OAuth2 client secret (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get account username (use carefully - exposes secret)
    pub fn username(&self) -> &str {
        self.username.expose_secret()
    }

    /// Get account password (use carefully - exposes secret)
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
