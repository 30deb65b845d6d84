pub mod auth;
pub mod builder;
pub mod connector;
pub mod converters;
pub mod rest;
pub mod types;

use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::ReqwestRest;
use crate::core::types::{ExchangeCapabilities, MarketInfo, MinimalOrder, Quantity, Symbol};
use rust_decimal::Decimal;

// Re-export main types for easier importing
pub use auth::KorbitAuth;
pub use builder::KorbitBuilder;
pub use connector::KorbitConnector;
pub use rest::KorbitRestClient;
pub use types::{
    KorbitBalance, KorbitCancelAck, KorbitOrder, KorbitOrderAck, KorbitTicker,
    KorbitTokenResponse, KorbitTransaction,
};

/// Create a Korbit connector with default settings
pub fn create_korbit_connector(
    config: ExchangeConfig,
) -> Result<KorbitConnector<ReqwestRest>, ExchangeError> {
    KorbitBuilder::new().with_config(config).build()
}

/// Static description of the markets Korbit supports
pub fn capabilities() -> ExchangeCapabilities {
    let market = |base: &str, quote: &str, min_amount: Decimal| MarketInfo {
        symbol: Symbol {
            base: base.to_string(),
            quote: quote.to_string(),
        },
        minimal_order: MinimalOrder {
            amount: Quantity::new(min_amount),
            unit: "asset".to_string(),
        },
    };

    ExchangeCapabilities {
        name: "Korbit",
        slug: "korbit",
        currencies: vec!["KRW"],
        assets: vec!["BCH", "BTC", "ETC", "ETH", "XRP"],
        markets: vec![
            market("BCH", "KRW", Decimal::new(5, 3)),
            market("BTC", "KRW", Decimal::new(1, 3)),
            market("ETC", "KRW", Decimal::new(1, 1)),
            market("ETH", "KRW", Decimal::new(1, 2)),
            market("XRP", "KRW", Decimal::from(10)),
        ],
        max_trades_age_minutes: 60,
    }
}
