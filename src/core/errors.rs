use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<crate::core::config::ConfigError> for ExchangeError {
    fn from(err: crate::core::config::ConfigError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

impl ExchangeError {
    /// HTTP status code carried by an `ApiError`, if any.
    pub fn http_status(&self) -> Option<i32> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for a 401 response, meaning the bearer token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.http_status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;

    #[test]
    fn config_error_converts_to_configuration_error() {
        let err: ExchangeError =
            ConfigError::MissingEnvironmentVariable("KORBIT_KEY".to_string()).into();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
        assert!(err.to_string().contains("KORBIT_KEY"));
    }

    #[test]
    fn only_401_api_errors_count_as_unauthorized() {
        let unauthorized = ExchangeError::ApiError {
            code: 401,
            message: "invalid_grant".to_string(),
        };
        assert!(unauthorized.is_unauthorized());

        let forbidden = ExchangeError::ApiError {
            code: 403,
            message: "forbidden".to_string(),
        };
        assert!(!forbidden.is_unauthorized());
        assert!(!ExchangeError::AuthError("no provider".to_string()).is_unauthorized());
    }
}
