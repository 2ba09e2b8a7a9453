//! Client side of `/news`: fetch a listing and render it into a container.
//!
//! The container is abstracted behind [`RenderPort`], so the fetch/parse
//! logic runs the same against [`HtmlContainer`](crate::render::HtmlContainer)
//! or any other sink (tests use the HTML container directly).
//!
//! # Flow
//!
//! 1. Read the query from the port (empty queries are sent as-is)
//! 2. `GET {base}/news?query=…`, no timeout, no retry
//! 3. Reject non-success statuses, then decode the body as `[Article]`
//! 4. Clear the container
//! 5. Render the empty message, or one card per article in received order
//!
//! Every failure happens before step 4, so a failed fetch leaves whatever
//! was rendered previously untouched.
//!
//! # Query encoding
//!
//! The query is form-urlencoded: `ethereum classic` goes on the wire as
//! `query=ethereum+classic` and decodes back to the exact input.

use crate::error::FetchError;
use crate::models::Article;
use crate::utils::truncate_for_log;
use reqwest::Client;
use tracing::{Span, debug, info, instrument, warn};
use url::Url;

/// Path of the listing endpoint, relative to the server origin.
pub const NEWS_PATH: &str = "/news";

/// Capability the fetcher renders through.
pub trait RenderPort {
    /// Current value of the query input.
    fn query(&self) -> String;

    /// Remove everything currently in the container.
    fn clear(&mut self);

    /// Insert the single "no results" node.
    fn render_empty(&mut self);

    /// Append one card per article, preserving order.
    fn render_articles(&mut self, articles: &[Article]);
}

/// What a successful fetch put into the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    /// The listing was empty; the no-results message is shown.
    Empty,
    /// This many cards were rendered.
    Cards(usize),
}

/// Fetches `/news` listings from a fixed server.
#[derive(Debug, Clone)]
pub struct NewsFetcher {
    client: Client,
    endpoint: Url,
}

impl NewsFetcher {
    /// Build a fetcher for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let endpoint = Url::parse(base_url)?.join(NEWS_PATH)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    /// The URL requested for `query`.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url
    }

    /// Request the listing for `query` and decode it.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] if the request could not be completed
    /// - [`FetchError::Status`] on a non-success status
    /// - [`FetchError::Decode`] if the body is not a JSON array of articles
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_news(&self, query: &str) -> Result<Vec<Article>, FetchError> {
        let url = self.request_url(query);
        debug!(%url, "Requesting news listing");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "News endpoint returned non-success status");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let articles = serde_json::from_slice::<Vec<Article>>(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&String::from_utf8_lossy(&body), 300),
                "News endpoint returned a malformed listing"
            );
            e
        })?;

        info!(count = articles.len(), "Fetched news listing");
        Ok(articles)
    }

    /// Fetch news for the port's current query and render it into the port.
    ///
    /// The container is cleared only once a listing has been decoded; on
    /// error it is left exactly as it was.
    #[instrument(level = "info", skip_all, fields(query = tracing::field::Empty))]
    pub async fn fetch_and_render_news<P>(&self, port: &mut P) -> Result<Rendered, FetchError>
    where
        P: RenderPort + ?Sized,
    {
        let query = port.query();
        Span::current().record("query", query.as_str());

        let articles = self.fetch_news(&query).await?;
        Ok(render_listing(port, &articles))
    }
}

/// Replace the port's contents with `articles`.
///
/// Clears unconditionally, then renders the empty message or one card per
/// article in the given order.
pub fn render_listing<P>(port: &mut P, articles: &[Article]) -> Rendered
where
    P: RenderPort + ?Sized,
{
    port.clear();
    if articles.is_empty() {
        port.render_empty();
        info!("No news found");
        return Rendered::Empty;
    }

    port.render_articles(articles);
    Rendered::Cards(articles.len())
}
