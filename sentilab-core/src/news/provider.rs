//! News provider trait.

use chrono::NaiveDate;

use crate::domain::{DataSourceMode, NewsItem};
use crate::error::DataError;

/// Result of a successful news fetch for one issuer.
#[derive(Debug, Clone)]
pub struct FetchedNews {
    pub issuer: String,
    pub items: Vec<NewsItem>,
    pub mode: DataSourceMode,
}

/// Trait for news-headline sources.
pub trait NewsProvider {
    fn name(&self) -> &str;

    fn mode(&self) -> DataSourceMode;

    /// Fetch headlines about an issuer over an inclusive date range.
    ///
    /// The real API is quota-capped (100 requests/day on the free tier), so
    /// implementations make one pass with no retries; any failure is
    /// treated as exhausted quota for the rest of the run.
    fn fetch(
        &self,
        issuer: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedNews, DataError>;
}
