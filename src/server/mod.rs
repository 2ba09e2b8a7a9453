//! The `/news` endpoint and the search page.
//!
//! `GET /news?query=<term>` asks every provider concurrently and returns the
//! concatenation of their articles as a JSON array, NewsData.io first and
//! CoinMarketCap second. Provider failures only shrink the listing.
//!
//! `GET /` serves the search page. With `?query=<term>` the same listing is
//! rendered server-side into the page's news container.

use crate::fetcher::render_listing;
use crate::models::Article;
use crate::render::{HtmlContainer, search_page};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, instrument};
use url::Url;

pub mod coins;
pub mod providers;

/// Upstream endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub newsdata_api_key: Option<String>,
    pub newsdata_base_url: Url,
    pub coinmarketcap_api_key: Option<String>,
    pub coinmarketcap_base_url: Url,
}

/// Shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: ProviderConfig,
}

impl AppState {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// Query string of `GET /news`.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub query: String,
}

/// Query string of `GET /`; absent until the form is submitted.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub query: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/news", get(news))
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "News endpoint listening");
    axum::serve(listener, router(state)).await
}

async fn collect_news(state: &AppState, query: &str) -> Vec<Article> {
    let (mut combined, overview) = tokio::join!(
        providers::fetch_newsdata(state, query),
        providers::fetch_coinmarketcap(state, query)
    );
    combined.extend(overview);
    combined
}

#[instrument(level = "info", skip(state))]
async fn news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsQuery>,
) -> Json<Vec<Article>> {
    let combined = collect_news(&state, &params.query).await;

    info!(count = combined.len(), "Serving news listing");
    Json(combined)
}

#[instrument(level = "info", skip(state))]
async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Html<String> {
    let mut container = HtmlContainer::new(params.query.clone().unwrap_or_default());
    if let Some(query) = params.query {
        let articles = collect_news(&state, &query).await;
        let rendered = render_listing(&mut container, &articles);
        info!(?rendered, "Serving search page");
    }
    Html(search_page(&container).into_string())
}
