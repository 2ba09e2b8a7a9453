//! HTML rendering of news cards.
//!
//! [`HtmlContainer`] is the in-memory results container: it owns the current
//! query value and the ordered list of nodes rendered into it, and implements
//! [`RenderPort`] so [`NewsFetcher`](crate::fetcher::NewsFetcher) can drive it.
//!
//! Markup is produced with `maud`, so titles, sources and URLs coming from the
//! endpoint are escaped instead of being injected verbatim.
//!
//! # Card layout
//!
//! ```text
//! <div class="news-item">
//!   <h3>title</h3>
//!   <p><strong>Source:</strong> source</p>
//!   <p><strong>Date:</strong> 5/1/2024, 10:00:00 AM</p>
//!   <a href="url" target="_blank">Read more</a>
//! </div>
//! ```

use crate::fetcher::RenderPort;
use crate::models::{Article, ArticleDate};
use chrono::{Local, TimeZone};
use maud::{DOCTYPE, Markup, html};
use std::fmt::Display;
use tracing::debug;

/// Message shown when the endpoint returns no articles.
pub const NO_NEWS_MESSAGE: &str = "No news found for this cryptocurrency.";

/// Shown in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// `1/1/2023, 12:00:00 AM`
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Format an article date for display in the given timezone.
pub fn format_date<Tz>(date: &ArticleDate, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date.parse() {
        Some(instant) => instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Format an article date in the viewer's local timezone.
pub fn format_local_date(date: &ArticleDate) -> String {
    format_date(date, &Local)
}

/// Render one article card, dates shown in local time.
pub fn article_card(article: &Article) -> Markup {
    card_with_date(article, &format_local_date(&article.date))
}

fn card_with_date(article: &Article, date: &str) -> Markup {
    html! {
        div class="news-item" {
            h3 { (article.title) }
            p { strong { "Source:" } " " (article.source) }
            p { strong { "Date:" } " " (date) }
            a href=(article.url) target="_blank" { "Read more" }
        }
    }
}

/// The informational node rendered for an empty listing.
pub fn empty_message() -> Markup {
    html! {
        p { (NO_NEWS_MESSAGE) }
    }
}

/// In-memory results container with an attached query input.
#[derive(Debug, Default)]
pub struct HtmlContainer {
    query: String,
    children: Vec<Markup>,
}

impl HtmlContainer {
    /// Create an empty container whose query input holds `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            children: Vec::new(),
        }
    }

    /// The container as `<div id="news-container">…</div>`.
    pub fn markup(&self) -> Markup {
        html! {
            div id="news-container" {
                @for child in &self.children {
                    (child)
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.markup().into_string()
    }
}

/// Full search page: the query input, a submit button and the container.
///
/// The form submits back to `/` with `?query=`, so the page works without
/// any client-side script.
pub fn search_page(container: &HtmlContainer) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Crypto News" }
            }
            body {
                h1 { "Crypto News" }
                form method="get" action="/" {
                    input id="cryptoInput" type="text" name="query"
                        placeholder="BTC, ETH, DOGE…" value=(container.query);
                    button type="submit" { "Get news" }
                }
                (container.markup())
            }
        }
    }
}

// Stand-ins for the user typing and for inspecting the DOM.
#[cfg(test)]
impl HtmlContainer {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl RenderPort for HtmlContainer {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn clear(&mut self) {
        self.children.clear();
    }

    fn render_empty(&mut self) {
        self.children.push(empty_message());
    }

    fn render_articles(&mut self, articles: &[Article]) {
        for article in articles {
            self.children.push(article_card(article));
        }
        debug!(count = articles.len(), "Rendered article cards");
    }
}
