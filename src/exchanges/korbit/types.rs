use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Korbit mixes numeric and string encodings for ids across endpoints
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

pub(crate) fn i64_string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// GET /v1/ticker/detailed
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitTicker {
    pub timestamp: i64,
    pub last: String,
    pub bid: String,
    pub ask: String,
    pub low: Option<String>,
    pub high: Option<String>,
    pub volume: Option<String>,
}

/// GET /v1/transactions
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitTransaction {
    /// Milliseconds since the epoch
    pub timestamp: i64,
    #[serde(deserialize_with = "i64_string_or_number")]
    pub tid: i64,
    pub price: String,
    pub amount: String,
}

/// One entry of the GET /v1/user/balances map, keyed by asset name
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitBalance {
    pub available: String,
    #[serde(default)]
    pub trade_in_use: Option<String>,
    #[serde(default)]
    pub withdrawal_in_use: Option<String>,
}

pub type KorbitBalances = HashMap<String, KorbitBalance>;

/// One entry of the GET /v1/user/volume map, keyed by currency pair
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitPairVolume {
    pub maker_fee: String,
    #[serde(default)]
    pub taker_fee: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

pub type KorbitVolumes = HashMap<String, KorbitPairVolume>;

/// One row of the GET /v1/user/orders query
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitOrder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub side: Option<String>,
    /// Volume-weighted average price over all fills; absent until first fill
    #[serde(default)]
    pub avg_price: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub order_amount: Option<String>,
    #[serde(default)]
    pub filled_amount: Option<String>,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub last_filled_at: Option<i64>,
}

/// POST /v1/user/orders/{buy,sell} acknowledgement
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitOrderAck {
    #[serde(rename = "orderId", deserialize_with = "string_or_number")]
    pub order_id: String,
    pub status: String,
    #[serde(rename = "currencyPair", default)]
    pub currency_pair: Option<String>,
}

/// POST /v1/user/orders/cancel acknowledgement (one element per order id)
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitCancelAck {
    #[serde(rename = "orderId", deserialize_with = "string_or_number")]
    pub order_id: String,
    pub status: String,
}

/// POST /v1/oauth2/access_token response
#[derive(Debug, Clone, Deserialize)]
pub struct KorbitTokenResponse {
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
