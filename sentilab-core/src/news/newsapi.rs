//! NewsAPI provider.
//!
//! Fetches headlines from `https://newsapi.org/v2/everything`. Auth is an
//! API key query param; the free tier is capped at 100 requests/day and one
//! month of history, so the requested range is walked in 30-day windows.
//! The first failed window aborts the whole fetch — quota is treated as
//! exhausted and the caller falls back to synthetic headlines.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{FetchedNews, NewsProvider};
use crate::domain::{DataSourceMode, NewsItem};
use crate::error::DataError;

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// NewsAPI `/v2/everything` client.
pub struct NewsApiProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl NewsApiProvider {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client, api_key }
    }

    fn fetch_window(
        &self,
        issuer: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>, DataError> {
        let url = format!(
            "https://newsapi.org/v2/everything\
             ?q={issuer}&from={from}&to={to}&sortBy=publishedAt&apiKey={}",
            self.api_key
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationFailed("invalid NewsAPI key".into()));
        }
        if !status.is_success() {
            return Err(DataError::ResponseFormatChanged(format!("HTTP {status}")));
        }

        let body: EverythingResponse = resp
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(e.to_string()))?;

        if body.status != "ok" {
            return Err(DataError::ResponseFormatChanged(format!(
                "NewsAPI status '{}'",
                body.status
            )));
        }

        Ok(parse_articles(issuer, body.articles))
    }
}

fn parse_articles(issuer: &str, articles: Vec<Article>) -> Vec<NewsItem> {
    articles
        .into_iter()
        .filter_map(|a| {
            let headline = a.title?;
            // Very short titles carry no usable signal
            if headline.trim().len() <= 5 {
                return None;
            }
            let date = a
                .published_at
                .as_deref()
                .and_then(|ts| ts.get(..10))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;
            Some(NewsItem {
                date,
                issuer: issuer.to_string(),
                headline,
                source: a
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "newsapi".to_string()),
            })
        })
        .collect()
}

impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "newsapi"
    }

    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Real
    }

    fn fetch(
        &self,
        issuer: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedNews, DataError> {
        let mut items = Vec::new();
        let mut window_start = start;

        while window_start <= end {
            let window_end = (window_start + chrono::Duration::days(29)).min(end);
            items.extend(self.fetch_window(issuer, window_start, window_end)?);
            window_start = window_end + chrono::Duration::days(1);
        }

        Ok(FetchedNews {
            issuer: issuer.to_string(),
            items,
            mode: DataSourceMode::Real,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, published: &str) -> Article {
        Article {
            title: Some(title.into()),
            published_at: Some(published.into()),
            source: Some(ArticleSource {
                name: Some("Reuters".into()),
            }),
        }
    }

    #[test]
    fn parses_articles_with_dates() {
        let items = parse_articles(
            "THYAO",
            vec![article("THYAO reports record quarterly profit", "2022-03-04T09:30:00Z")],
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date, NaiveDate::from_ymd_opt(2022, 3, 4).unwrap());
        assert_eq!(items[0].issuer, "THYAO");
        assert_eq!(items[0].source, "Reuters");
    }

    #[test]
    fn drops_untitled_and_short_titles() {
        let items = parse_articles(
            "THYAO",
            vec![
                Article {
                    title: None,
                    published_at: Some("2022-03-04T09:30:00Z".into()),
                    source: None,
                },
                article("ok", "2022-03-04T09:30:00Z"),
            ],
        );
        assert!(items.is_empty());
    }

    #[test]
    fn drops_unparseable_dates() {
        let items = parse_articles("THYAO", vec![article("THYAO expands routes", "soon")]);
        assert!(items.is_empty());
    }
}
