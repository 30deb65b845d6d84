pub mod core;
pub mod exchanges;

pub use crate::core::{config::ExchangeConfig, errors::ExchangeError, traits::ExchangeConnector};
pub use crate::exchanges::korbit::{create_korbit_connector, KorbitBuilder, KorbitConnector};
