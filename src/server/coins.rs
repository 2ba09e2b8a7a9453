//! Ticker symbol to coin name resolution for provider searches.

/// Map a ticker symbol to the coin name NewsData.io indexes it under.
///
/// Matching is case-insensitive. Anything that is not a known ticker is
/// returned unchanged, so full names and free-text searches pass through.
pub fn resolve_coin_name(symbol: &str) -> &str {
    match symbol.to_uppercase().as_str() {
        "BTC" => "Bitcoin",
        "ETH" => "Ethereum",
        "BNB" => "Binance Coin",
        "ADA" => "Cardano",
        "DOGE" => "Dogecoin",
        "XRP" => "Ripple",
        "SOL" => "Solana",
        "DOT" => "Polkadot",
        "AVAX" => "Avalanche",
        _ => symbol,
    }
}
