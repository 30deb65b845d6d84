use korbitx::core::config::ExchangeConfig;
use korbitx::core::traits::{AccountInfo, MarketDataSource};
use korbitx::KorbitBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 Korbit Exchange Connector Example");
    println!("====================================");

    // Public endpoints need no credentials
    let korbit = KorbitBuilder::new().with_market("btc", "krw").build()?;

    // Example 1: Get the current ticker
    println!("\n💰 Getting btc_krw ticker...");
    match korbit.get_ticker().await {
        Ok(ticker) => {
            println!("  Bid: {} KRW", ticker.bid);
            println!("  Ask: {} KRW", ticker.ask);
        }
        Err(e) => eprintln!("Error getting ticker: {}", e),
    }

    // Example 2: Get recent public trades
    println!("\n📊 Getting recent trades...");
    match korbit.get_trades(None, true).await {
        Ok(trades) => {
            println!("Found {} trades in the last day:", trades.len());
            for trade in trades.iter().take(5) {
                println!("  #{}: {} @ {} KRW", trade.tid, trade.amount, trade.price);
            }
        }
        Err(e) => eprintln!("Error getting trades: {}", e),
    }

    // Example 3: Authenticated endpoints, when credentials are configured
    // You need to set KORBIT_KEY, KORBIT_SECRET, KORBIT_USERNAME and
    // KORBIT_PASSPHRASE
    match ExchangeConfig::from_env_file("KORBIT") {
        Ok(config) => {
            let korbit = KorbitBuilder::new().with_config(config).build()?;

            println!("\n🏦 Getting account portfolio...");
            match korbit.get_portfolio().await {
                Ok(portfolio) => {
                    for balance in portfolio.iter().filter(|b| !b.amount.value().is_zero()) {
                        println!("  {}: {}", balance.asset, balance.amount);
                    }
                }
                Err(e) => eprintln!("Error getting portfolio: {}", e),
            }

            println!("\n🧾 Getting maker fee...");
            match korbit.get_fee().await {
                Ok(fee) => println!("  Maker fee: {}", fee),
                Err(e) => eprintln!("Error getting fee: {}", e),
            }
        }
        Err(e) => {
            println!("\n⚠️  Skipping authenticated examples: {}", e);
        }
    }

    Ok(())
}
