use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Typed errors for the types subsystem
#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] rust_decimal::Error),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Type-safe symbol representation with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub base: String,
    pub quote: String,
}

impl Symbol {
    /// Create a new symbol with validation
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Result<Self, TypesError> {
        let base = base.into();
        let quote = quote.into();

        if base.is_empty() || quote.is_empty() {
            return Err(TypesError::InvalidSymbol(
                "Base and quote assets cannot be empty".to_string(),
            ));
        }

        Ok(Symbol { base, quote })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Type-safe price representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Price(value)
    }

    pub fn from_str(s: &str) -> Result<Self, TypesError> {
        Ok(Price(s.parse()?))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe quantity representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    pub fn from_str(s: &str) -> Result<Self, TypesError> {
        Ok(Quantity(s.parse()?))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversion helpers for exchange payloads that carry numbers as strings
pub mod conversion {
    use super::*;

    /// Convert string to Price with zero fallback
    #[inline]
    pub fn string_to_price(s: &str) -> Price {
        Price::from_str(s).unwrap_or_else(|_| Price::new(Decimal::ZERO))
    }

    /// Convert string to Quantity with zero fallback
    #[inline]
    pub fn string_to_quantity(s: &str) -> Quantity {
        Quantity::from_str(s).unwrap_or_else(|_| Quantity::new(Decimal::ZERO))
    }

    /// Convert string to Decimal with zero fallback
    #[inline]
    pub fn string_to_decimal(s: &str) -> Decimal {
        s.parse().unwrap_or(Decimal::ZERO)
    }
}

/// Best bid/ask snapshot for a market pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ticker {
    pub bid: Price,
    pub ask: Price,
}

/// Available funds for one asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Uppercase asset name, e.g. "BTC"
    pub asset: String,
    pub amount: Quantity,
}

/// Exchange-assigned order identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill state of an order: volume-weighted average price over all partial
/// executions, total filled amount and the time of the last fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFill {
    pub price: Price,
    pub amount: Quantity,
    pub last_filled_at: Option<DateTime<Utc>>,
}

impl OrderFill {
    /// Fill record for an order the exchange no longer reports
    pub fn empty() -> Self {
        Self {
            price: Price::new(Decimal::ZERO),
            amount: Quantity::new(Decimal::ZERO),
            last_filled_at: None,
        }
    }
}

/// Lifecycle state of a resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Unfilled,
    PartiallyFilled,
    Filled,
    /// Status string the exchange returned that we do not recognize
    Unknown(String),
}

/// One public trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub tid: i64,
    pub price: Price,
    pub amount: Quantity,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

/// Time window for public trade history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeInterval {
    Minute,
    Hour,
    Day,
}

impl TradeInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

/// Minimal order size for a market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimalOrder {
    pub amount: Quantity,
    /// Unit the minimum is expressed in ("asset" or "currency")
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    pub symbol: Symbol,
    pub minimal_order: MinimalOrder,
}

/// Static description of what the exchange supports
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeCapabilities {
    pub name: &'static str,
    pub slug: &'static str,
    pub currencies: Vec<&'static str>,
    pub assets: Vec<&'static str>,
    pub markets: Vec<MarketInfo>,
    /// Maximum age in minutes of trades the history endpoint can return
    pub max_trades_age_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_rejects_empty_parts() {
        assert!(Symbol::new("btc", "").is_err());
        assert!(Symbol::new("", "krw").is_err());
        assert!(Symbol::new("btc", "krw").is_ok());
    }

    #[test]
    fn price_round_trips_through_string_serde() {
        let price = Price::from_str("12345678.5").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"12345678.5\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn conversion_falls_back_to_zero() {
        assert_eq!(conversion::string_to_price("bogus").value(), Decimal::ZERO);
        assert_eq!(
            conversion::string_to_quantity("0.5").value(),
            "0.5".parse::<Decimal>().unwrap()
        );
    }
}
