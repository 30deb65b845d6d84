use crate::core::{
    errors::ExchangeError,
    types::{Balance, OrderFill, OrderId, Price, Quantity, Ticker, Trade},
};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait MarketDataSource {
    /// Get the current best bid/ask for the configured market
    async fn get_ticker(&self) -> Result<Ticker, ExchangeError>;

    /// Get recent public trades for the configured market.
    ///
    /// Trades at or before `since` (unix seconds) are dropped when given.
    /// Results are sorted by timestamp, ascending unless `descending` is set.
    async fn get_trades(
        &self,
        since: Option<i64>,
        descending: bool,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    /// Get the maker fee rate as a fraction (0.2% is 0.002)
    async fn get_fee(&self) -> Result<Decimal, ExchangeError>;

    /// Get available balances for every asset and currency on the account
    async fn get_portfolio(&self) -> Result<Vec<Balance>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a limit buy order for `amount` of the asset at `price` each
    async fn buy(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError>;

    /// Place a limit sell order for `amount` of the asset at `price` each
    async fn sell(&self, amount: Quantity, price: Price) -> Result<OrderId, ExchangeError>;

    /// Get fill information for a previously placed order
    async fn get_order(&self, id: &OrderId) -> Result<OrderFill, ExchangeError>;

    /// Check whether an order is completely filled.
    ///
    /// Partially filled orders count as not filled. An order the exchange no
    /// longer reports counts as filled.
    async fn check_order(&self, id: &OrderId) -> Result<bool, ExchangeError>;

    /// Cancel a resting order. Succeeds if the order was already filled or
    /// already canceled.
    async fn cancel_order(&self, id: &OrderId) -> Result<(), ExchangeError>;
}

/// Composite trait for connectors exposing the full trading surface
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
