//! # crypto_news
//!
//! Cryptocurrency news, end to end:
//!
//! - `fetch`: read a query, request `/news?query=…`, and render the returned
//!   articles as HTML cards (or a "no results" message) into a container
//! - `serve`: the `/news` endpoint itself, aggregating NewsData.io articles
//!   and a CoinMarketCap overview for the queried coin
//!
//! ## Usage
//!
//! ```sh
//! crypto_news serve &
//! crypto_news fetch btc -o news.html
//! ```
//!
//! Logs go to stderr so the rendered HTML can be piped from stdout.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod fetcher;
mod models;
mod render;
mod server;
mod utils;

use cli::{Cli, Command, FetchArgs, ServeArgs};
use fetcher::{NewsFetcher, Rendered};
use render::HtmlContainer;
use server::{AppState, ProviderConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    match args.command {
        Command::Fetch(fetch) => run_fetch(fetch).await,
        Command::Serve(serve) => run_serve(serve).await,
    }
}

async fn run_fetch(args: FetchArgs) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    let fetcher = NewsFetcher::new(&args.base_url)?;
    let mut container = HtmlContainer::new(args.query);

    match fetcher.fetch_and_render_news(&mut container).await {
        Ok(Rendered::Empty) => info!("Rendered empty result"),
        Ok(Rendered::Cards(count)) => info!(count, "Rendered news cards"),
        Err(e) => {
            error!(error = %e, base_url = %args.base_url, "Fetching news failed");
            return Err(e.into());
        }
    }

    let html = container.to_html();
    match args.output {
        Some(path) => {
            tokio::fs::write(&path, html).await?;
            info!(path = %path.display(), "Wrote news container");
        }
        None => println!("{html}"),
    }

    let elapsed = start_time.elapsed();
    info!(millis = elapsed.as_millis() as u64, "Fetch complete");
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let config = ProviderConfig {
        newsdata_api_key: args.newsapi_key,
        newsdata_base_url: args.newsdata_base_url,
        coinmarketcap_api_key: args.coinmarketcap_api_key,
        coinmarketcap_base_url: args.coinmarketcap_base_url,
    };
    if config.newsdata_api_key.is_none() {
        warn!("NEWSAPI_KEY not set; NewsData.io results disabled");
    }
    if config.coinmarketcap_api_key.is_none() {
        warn!("COINMARKETCAP_API_KEY not set; CoinMarketCap results disabled");
    }

    server::serve(args.bind, AppState::new(config)).await?;
    Ok(())
}
