//! Date-cursor pagination for insider trades and company news.
//!
//! The API pages by date rather than by offset or token: each request asks for
//! records up to an upper-bound date, and the next request uses the oldest date
//! seen in the previous page as its new upper bound. Pages are appended in
//! arrival order, so the result is grouped newest batch first and is not
//! globally sorted.

use chrono::NaiveDate;
use findata_core::{CursorRecord, DataError, Result, Ticker, date_part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::FinancialDatasetsClient;
use crate::models::{CompanyNewsResponse, InsiderTradeResponse};
use crate::transport::ApiRequest;

/// An endpoint paginated by a date cursor.
pub(crate) trait PagedEndpoint {
    /// Record type carried in each page.
    type Record: CursorRecord;
    /// Response envelope wrapping one page.
    type Envelope: DeserializeOwned + Into<Vec<Self::Record>>;

    /// Path relative to the API base URL.
    const PATH: &'static str;
    /// Query parameter carrying the inclusive upper bound.
    const UPPER_BOUND: &'static str;
    /// Query parameter carrying the optional lower bound.
    const LOWER_BOUND: &'static str;
}

/// `GET /insider-trades/`, paged on `filing_date`.
#[derive(Debug)]
pub(crate) struct InsiderTrades;

impl PagedEndpoint for InsiderTrades {
    type Record = findata_core::InsiderTrade;
    type Envelope = InsiderTradeResponse;

    const PATH: &'static str = "insider-trades/";
    const UPPER_BOUND: &'static str = "filing_date_lte";
    const LOWER_BOUND: &'static str = "filing_date_gte";
}

/// `GET /news/`, paged on `date`.
#[derive(Debug)]
pub(crate) struct News;

impl PagedEndpoint for News {
    type Record = findata_core::CompanyNews;
    type Envelope = CompanyNewsResponse;

    const PATH: &'static str = "news/";
    const UPPER_BOUND: &'static str = "end_date";
    const LOWER_BOUND: &'static str = "start_date";
}

/// Returns the oldest cursor date in a page, time-of-day dropped.
fn oldest_cursor<R: CursorRecord>(page: &[R]) -> Result<Option<NaiveDate>> {
    page.iter()
        .try_fold(None, |oldest: Option<NaiveDate>, record| {
            let date = date_part(record.cursor())?;
            Ok(Some(oldest.map_or(date, |o| o.min(date))))
        })
}

impl FinancialDatasetsClient {
    /// Builds the URL for one page of `E` ending at `upper`.
    pub(crate) fn page_url<E: PagedEndpoint>(
        &self,
        ticker: &Ticker,
        upper: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
    ) -> String {
        let mut url = format!(
            "{}/{}?ticker={ticker}&{}={upper}",
            self.base_url(),
            E::PATH,
            E::UPPER_BOUND
        );
        if let Some(start) = start {
            url.push_str(&format!("&{}={start}", E::LOWER_BOUND));
        }
        url.push_str(&format!("&limit={limit}"));
        url
    }

    /// Walks the date cursor from `end` back towards `start`, collecting every page.
    ///
    /// Stops when a page is empty, when there is no `start` to walk back to, when a
    /// page comes back shorter than `limit`, or once the cursor reaches `start`.
    /// Any failed request aborts the walk and discards what was collected.
    pub(crate) async fn collect_pages<E: PagedEndpoint>(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<E::Record>> {
        if limit == 0 {
            return Err(DataError::InvalidParameter(
                "page limit must be at least 1".to_string(),
            ));
        }

        let headers = self.headers(api_key)?;
        let mut current_end = end;
        let mut accumulated = Vec::new();

        loop {
            let url = self.page_url::<E>(ticker, current_end, start, limit);
            let request = ApiRequest::get(url).with_headers(headers.clone());
            let response = self.executor().execute(&request).await?;
            if !response.is_success() {
                return Err(DataError::http(
                    ticker.as_str(),
                    response.status.as_u16(),
                    response.body,
                ));
            }

            let page: Vec<E::Record> = response.json::<E::Envelope>()?.into();
            if page.is_empty() {
                break;
            }
            debug!(
                ticker = %ticker,
                upper = %current_end,
                records = page.len(),
                "Fetched page"
            );

            let next = match start {
                Some(start) if page.len() >= limit => {
                    oldest_cursor(&page)?.map(|oldest| (start, oldest))
                }
                _ => None,
            };
            accumulated.extend(page);

            let Some((start, oldest)) = next else {
                break;
            };
            if oldest >= current_end {
                // A full page that does not move the cursor would be fetched again forever.
                warn!(
                    ticker = %ticker,
                    cursor = %current_end,
                    "Page did not advance the date cursor, stopping pagination"
                );
                break;
            }
            current_end = oldest;
            if current_end <= start {
                break;
            }
        }

        Ok(accumulated)
    }
}
