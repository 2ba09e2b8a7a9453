//! Upstream news providers queried by the `/news` endpoint.
//!
//! | Provider | Endpoint | Yields |
//! |----------|----------|--------|
//! | NewsData.io | `/api/1/news` | up to 5 articles about the resolved coin name |
//! | CoinMarketCap | `/v1/cryptocurrency/info` | one "Overview of …" article linking the coin's website |
//!
//! Each provider has a fallible `query_*` function and an infallible
//! `fetch_*` wrapper. The wrapper logs the failure and contributes no
//! articles, so one broken provider never takes the endpoint down.

use super::AppState;
use super::coins::resolve_coin_name;
use crate::error::ProviderError;
use crate::models::Article;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Maximum number of NewsData.io results kept per query.
pub const NEWSDATA_LIMIT: usize = 5;

const NEWSDATA_DEFAULT_SOURCE: &str = "NewsData.io";
const CMC_SOURCE: &str = "CoinMarketCap";

#[derive(Debug, Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<NewsDataItem>,
}

#[derive(Debug, Deserialize)]
struct NewsDataItem {
    title: Option<String>,
    link: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

impl From<NewsDataItem> for Article {
    fn from(item: NewsDataItem) -> Self {
        Article {
            title: item.title.unwrap_or_default(),
            url: item.link.unwrap_or_default(),
            source: item
                .source_id
                .unwrap_or_else(|| NEWSDATA_DEFAULT_SOURCE.to_string()),
            date: item.pub_date.unwrap_or_default().into(),
        }
    }
}

// CMC fills absent sections with `null`; none of them should sink the decode.
#[derive(Debug, Deserialize)]
struct CmcInfoResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data: HashMap<String, Option<CmcCoin>>,
}

#[derive(Debug, Default, Deserialize)]
struct CmcCoin {
    #[serde(default, deserialize_with = "null_as_default")]
    urls: CmcUrls,
}

#[derive(Debug, Default, Deserialize)]
struct CmcUrls {
    #[serde(default, deserialize_with = "null_as_default")]
    website: Vec<Option<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// NewsData.io articles for `query`, or none if the provider fails.
pub async fn fetch_newsdata(state: &AppState, query: &str) -> Vec<Article> {
    match query_newsdata(state, query).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(provider = "newsdata", error = %e, "Provider failed; contributing no articles");
            Vec::new()
        }
    }
}

/// CoinMarketCap overview for `query`, or none if the provider fails.
pub async fn fetch_coinmarketcap(state: &AppState, query: &str) -> Vec<Article> {
    match query_coinmarketcap(state, query).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!(provider = "coinmarketcap", error = %e, "Provider failed; contributing no articles");
            Vec::new()
        }
    }
}

/// Build the NewsData.io search URL for `query`.
pub fn newsdata_url(base: &Url, api_key: &str, query: &str) -> Result<Url, ProviderError> {
    let search_term = resolve_coin_name(query).to_lowercase();
    let mut url = base.join("/api/1/news")?;
    url.query_pairs_mut()
        .append_pair("apikey", api_key)
        .append_pair("q", &search_term)
        .append_pair("language", "en");
    Ok(url)
}

#[instrument(level = "info", skip(state))]
async fn query_newsdata(state: &AppState, query: &str) -> Result<Vec<Article>, ProviderError> {
    let api_key = state
        .config
        .newsdata_api_key
        .as_deref()
        .ok_or(ProviderError::MissingKey("NEWSAPI_KEY"))?;
    let url = newsdata_url(&state.config.newsdata_base_url, api_key, query)?;

    let response = state.client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status));
    }

    let body = response.bytes().await?;
    let parsed: NewsDataResponse = serde_json::from_slice(&body)?;
    debug!(results = parsed.results.len(), "NewsData.io responded");

    let articles: Vec<Article> = parsed
        .results
        .into_iter()
        .take(NEWSDATA_LIMIT)
        .map(Article::from)
        .collect();
    info!(count = articles.len(), "Collected NewsData.io articles");
    Ok(articles)
}

#[instrument(level = "info", skip(state))]
async fn query_coinmarketcap(
    state: &AppState,
    query: &str,
) -> Result<Vec<Article>, ProviderError> {
    let api_key = state
        .config
        .coinmarketcap_api_key
        .as_deref()
        .ok_or(ProviderError::MissingKey("COINMARKETCAP_API_KEY"))?;
    let symbol = query.to_uppercase();
    let mut url = state
        .config
        .coinmarketcap_base_url
        .join("/v1/cryptocurrency/info")?;
    url.query_pairs_mut().append_pair("symbol", &symbol);

    let response = state
        .client
        .get(url)
        .header("X-CMC_PRO_API_KEY", api_key)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status));
    }

    let body = response.bytes().await?;
    let parsed: CmcInfoResponse = serde_json::from_slice(&body)?;

    let website = parsed
        .data
        .get(&symbol)
        .and_then(Option::as_ref)
        .and_then(|coin| coin.urls.website.first())
        .and_then(Option::as_ref);
    let Some(website) = website else {
        debug!(%symbol, "No CoinMarketCap website for symbol");
        return Ok(Vec::new());
    };

    info!(%symbol, "Collected CoinMarketCap overview");
    Ok(vec![Article {
        title: format!("Overview of {symbol}"),
        url: website.clone(),
        source: CMC_SOURCE.to_string(),
        date: Utc::now().to_rfc3339().into(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ProviderConfig;
    use mockito::Matcher;

    fn state_for(server: &mockito::ServerGuard, keys: bool) -> AppState {
        let base = Url::parse(&server.url()).unwrap();
        AppState::new(ProviderConfig {
            newsdata_api_key: keys.then(|| "nd-key".to_string()),
            newsdata_base_url: base.clone(),
            coinmarketcap_api_key: keys.then(|| "cmc-key".to_string()),
            coinmarketcap_base_url: base,
        })
    }

    #[test]
    fn test_newsdata_url_resolves_symbol() {
        let base = Url::parse("https://newsdata.io").unwrap();
        let url = newsdata_url(&base, "k", "ETH").unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsdata.io/api/1/news?apikey=k&q=ethereum&language=en"
        );
    }

    #[test]
    fn test_newsdata_item_defaults() {
        let item: NewsDataItem = serde_json::from_str(r#"{"title": null}"#).unwrap();
        let article = Article::from(item);
        assert_eq!(article.title, "");
        assert_eq!(article.url, "");
        assert_eq!(article.source, "NewsData.io");
        assert_eq!(article.date, "".into());
    }

    #[tokio::test]
    async fn test_newsdata_maps_and_caps_results() {
        let mut server = mockito::Server::new_async().await;
        let results: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "title": format!("story {i}"),
                    "link": format!("https://news.example/{i}"),
                    "source_id": "coindesk",
                    "pubDate": "2024-05-01 10:00:00",
                })
            })
            .collect();
        let mock = server
            .mock("GET", "/api/1/news")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apikey".into(), "nd-key".into()),
                Matcher::UrlEncoded("q".into(), "bitcoin".into()),
                Matcher::UrlEncoded("language".into(), "en".into()),
            ]))
            .with_body(serde_json::json!({ "status": "success", "results": results }).to_string())
            .create_async()
            .await;

        let state = state_for(&server, true);
        let articles = fetch_newsdata(&state, "btc").await;

        mock.assert_async().await;
        assert_eq!(articles.len(), NEWSDATA_LIMIT);
        assert_eq!(articles[0].title, "story 0");
        assert_eq!(articles[4].title, "story 4");
        assert_eq!(articles[0].url, "https://news.example/0");
        assert_eq!(articles[0].source, "coindesk");
        assert_eq!(articles[0].date, "2024-05-01 10:00:00".into());
    }

    #[tokio::test]
    async fn test_newsdata_without_key_is_empty() {
        let server = mockito::Server::new_async().await;
        let state = state_for(&server, false);

        assert!(fetch_newsdata(&state, "btc").await.is_empty());
        assert!(matches!(
            query_newsdata(&state, "btc").await,
            Err(ProviderError::MissingKey("NEWSAPI_KEY"))
        ));
    }

    #[tokio::test]
    async fn test_newsdata_failure_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/1/news")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let state = state_for(&server, true);
        assert!(fetch_newsdata(&state, "btc").await.is_empty());
    }

    #[tokio::test]
    async fn test_newsdata_request_error_hides_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let state = AppState::new(ProviderConfig {
            newsdata_api_key: Some("SECRET-KEY".to_string()),
            newsdata_base_url: base.clone(),
            coinmarketcap_api_key: None,
            coinmarketcap_base_url: base,
        });
        let err = query_newsdata(&state, "btc").await.unwrap_err();

        assert!(matches!(err, ProviderError::Http(_)));
        assert!(!err.to_string().contains("SECRET-KEY"));
        assert!(!format!("{err:?}").contains("SECRET-KEY"));
    }

    #[tokio::test]
    async fn test_coinmarketcap_overview() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/cryptocurrency/info")
            .match_query(Matcher::UrlEncoded("symbol".into(), "BTC".into()))
            .match_header("X-CMC_PRO_API_KEY", "cmc-key")
            .with_body(r#"{"data":{"BTC":{"urls":{"website":["https://bitcoin.org/"]}}}}"#)
            .create_async()
            .await;

        let state = state_for(&server, true);
        let articles = fetch_coinmarketcap(&state, "btc").await;

        mock.assert_async().await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Overview of BTC");
        assert_eq!(articles[0].url, "https://bitcoin.org/");
        assert_eq!(articles[0].source, "CoinMarketCap");
        assert!(articles[0].date.parse().is_some());
    }

    #[tokio::test]
    async fn test_coinmarketcap_without_website_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/cryptocurrency/info")
            .match_query(Matcher::Any)
            .with_body(r#"{"data":{"BTC":{"urls":{"website":[]}}}}"#)
            .create_async()
            .await;

        let state = state_for(&server, true);
        assert!(fetch_coinmarketcap(&state, "btc").await.is_empty());
    }

    #[tokio::test]
    async fn test_coinmarketcap_tolerates_null_sections() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/cryptocurrency/info")
            .match_query(Matcher::Any)
            .with_body(
                r#"{"data":{
                    "DOGE": null,
                    "ETH": {"urls": null},
                    "SOL": {"urls": {"website": null}},
                    "BTC": {"urls": {"website": ["https://bitcoin.org/"]}}
                }}"#,
            )
            .create_async()
            .await;

        let state = state_for(&server, true);
        let articles = query_coinmarketcap(&state, "btc").await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://bitcoin.org/");

        assert!(query_coinmarketcap(&state, "eth").await.unwrap().is_empty());
        assert!(query_coinmarketcap(&state, "sol").await.unwrap().is_empty());
        assert!(query_coinmarketcap(&state, "doge").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coinmarketcap_null_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/cryptocurrency/info")
            .match_query(Matcher::Any)
            .with_body(r#"{"status": {"error_code": 400}, "data": null}"#)
            .create_async()
            .await;

        let state = state_for(&server, true);
        assert!(query_coinmarketcap(&state, "btc").await.unwrap().is_empty());
    }
}
