//! Command-line interface definitions.
//!
//! Endpoints and API keys can also be supplied through environment variables
//! (a `.env` file is loaded at startup).

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments for crypto_news.
///
/// # Examples
///
/// ```sh
/// # Render news about BTC from a local server to stdout
/// crypto_news fetch btc
///
/// # Write the rendered container to a file
/// crypto_news fetch "ethereum classic" --base-url http://news.local:3000 -o news.html
///
/// # Run the /news endpoint
/// NEWSAPI_KEY=... COINMARKETCAP_API_KEY=... crypto_news serve --bind 0.0.0.0:3000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch news for a query and render it as HTML cards
    Fetch(FetchArgs),
    /// Serve the /news endpoint
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Search term, sent as-is (may be empty)
    #[arg(default_value = "")]
    pub query: String,

    /// Origin of the server exposing /news
    #[arg(short, long, env = "NEWS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    pub base_url: String,

    /// Write the rendered container here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// NewsData.io API key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// CoinMarketCap API key
    #[arg(long, env = "COINMARKETCAP_API_KEY", hide_env_values = true)]
    pub coinmarketcap_api_key: Option<String>,

    /// NewsData.io origin
    #[arg(long, env = "NEWSDATA_BASE_URL", default_value = "https://newsdata.io")]
    pub newsdata_base_url: url::Url,

    /// CoinMarketCap origin
    #[arg(
        long,
        env = "COINMARKETCAP_BASE_URL",
        default_value = "https://pro-api.coinmarketcap.com"
    )]
    pub coinmarketcap_base_url: url::Url,
}
