use crate::core::errors::ExchangeError;
use crate::core::types::{
    conversion, Balance, OrderFill, OrderId, OrderStatus, Quantity, Ticker, Trade,
};
use crate::exchanges::korbit::types::{
    KorbitBalances, KorbitOrder, KorbitOrderAck, KorbitTicker, KorbitTransaction, KorbitVolumes,
};
use chrono::DateTime;
use rust_decimal::Decimal;
use tracing::debug;

/// Pair the original fee endpoint consumers always fell back to
const DEFAULT_FEE_PAIR: &str = "btc_krw";

/// Render a currency pair the way Korbit spells it, e.g. ("btc", "krw") -> "btc_krw"
pub fn to_korbit_pair(asset: &str, currency: &str) -> String {
    format!("{}_{}", asset.to_lowercase(), currency.to_lowercase())
}

/// Number of decimal places Korbit accepts for order amounts of an asset
fn amount_scale(asset: &str) -> Option<u32> {
    match asset.to_lowercase().as_str() {
        "bch" | "btc" | "etc" | "eth" => Some(8),
        "xrp" => Some(6),
        _ => None,
    }
}

/// Truncate an order amount to the precision the exchange accepts for the
/// asset (toward zero, so we never order more than requested)
pub fn truncate_amount(asset: &str, amount: Quantity) -> Quantity {
    match amount_scale(asset) {
        Some(scale) => Quantity::new(amount.value().trunc_with_scale(scale)),
        None => amount,
    }
}

/// Convert the detailed ticker to the core bid/ask snapshot
pub fn convert_ticker(ticker: &KorbitTicker) -> Ticker {
    Ticker {
        bid: conversion::string_to_price(&ticker.bid),
        ask: conversion::string_to_price(&ticker.ask),
    }
}

/// Convert the balances map to a portfolio of available funds
pub fn convert_portfolio(balances: KorbitBalances) -> Vec<Balance> {
    let mut portfolio: Vec<Balance> = balances
        .into_iter()
        .map(|(asset, balance)| Balance {
            asset: asset.to_uppercase(),
            amount: conversion::string_to_quantity(&balance.available),
        })
        .collect();
    // HashMap iteration order is arbitrary; keep output stable
    portfolio.sort_by(|a, b| a.asset.cmp(&b.asset));
    portfolio
}

/// Extract the maker fee rate for a pair from the volume response, falling
/// back to the btc_krw entry when the pair has no fee information
pub fn maker_fee(volumes: &KorbitVolumes, pair: &str) -> Result<Decimal, ExchangeError> {
    volumes
        .get(pair)
        .or_else(|| volumes.get(DEFAULT_FEE_PAIR))
        .map(|entry| conversion::string_to_decimal(&entry.maker_fee))
        .ok_or_else(|| ExchangeError::Other(format!("no fee information for {}", pair)))
}

/// Convert an order query row to fill information.
///
/// A missing row means the exchange no longer reports the order (typically
/// canceled); that maps to an empty fill.
pub fn convert_order_fill(id: &OrderId, order: Option<&KorbitOrder>) -> OrderFill {
    let Some(order) = order else {
        debug!(order_id = %id, "order query returned no result");
        return OrderFill::empty();
    };

    let price = order
        .avg_price
        .as_deref()
        .or(order.price.as_deref())
        .map(conversion::string_to_price)
        .unwrap_or_else(|| conversion::string_to_price("0"));

    let amount = order
        .filled_amount
        .as_deref()
        .map(conversion::string_to_quantity)
        .unwrap_or_else(|| conversion::string_to_quantity("0"));

    let last_filled_at = order
        .last_filled_at
        .and_then(DateTime::from_timestamp_millis);

    OrderFill {
        price,
        amount,
        last_filled_at,
    }
}

/// Map a Korbit order status string to the core enum
pub fn convert_order_status(status: &str) -> OrderStatus {
    match status {
        "unfilled" => OrderStatus::Unfilled,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        other => OrderStatus::Unknown(other.to_string()),
    }
}

/// Validate an order placement acknowledgement and extract the order id
pub fn order_id_from_ack(ack: KorbitOrderAck, side: &str) -> Result<OrderId, ExchangeError> {
    if ack.status == "success" {
        Ok(OrderId::new(ack.order_id))
    } else {
        Err(ExchangeError::Other(format!(
            "unable to {}: {}",
            side, ack.status
        )))
    }
}

/// Convert public transactions to trades, dropping those at or before
/// `since` (unix seconds) and sorting by timestamp
pub fn convert_trades(
    transactions: Vec<KorbitTransaction>,
    since: Option<i64>,
    descending: bool,
) -> Vec<Trade> {
    let mut trades: Vec<Trade> = transactions
        .into_iter()
        .map(|tx| Trade {
            tid: tx.tid,
            price: conversion::string_to_price(&tx.price),
            amount: conversion::string_to_quantity(&tx.amount),
            timestamp: tx.timestamp / 1000,
        })
        .filter(|trade| since.map_or(true, |since| trade.timestamp > since))
        .collect();

    if descending {
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    } else {
        trades.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }
    trades
}
