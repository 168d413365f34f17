//! Financial Datasets API client.

use chrono::{Local, NaiveDate};
use findata_core::{
    CompanyFacts, CompanyNews, DataCache, DataError, FinancialMetrics, InsiderTrade, LineItem,
    MetricsKey, Period, Price, PriceKey, Result, Ticker, WindowKey,
};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{FdsConfig, env_api_key, resolve_api_key};
use crate::executor::RequestExecutor;
use crate::models::{
    CompanyFactsResponse, FinancialMetricsResponse, LineItemResponse, PriceResponse,
};
use crate::paginate::{InsiderTrades, News};
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport, auth_headers};

/// Default number of metric periods requested when deriving market cap.
const MARKET_CAP_METRICS_LIMIT: usize = 10;

/// Financial Datasets API client.
///
/// Provides access to:
/// - Daily prices
/// - Financial metrics and line-item search
/// - Insider trades and company news (paginated by date)
/// - Company facts and market capitalization
///
/// Every request is sent through a [`RequestExecutor`], so rate-limited calls are
/// retried with linear backoff. Results are stored in the injected cache under
/// exact-match keys; empty results are never cached.
#[derive(Clone)]
pub struct FinancialDatasetsClient {
    executor: RequestExecutor,
    config: FdsConfig,
    cache: Arc<dyn DataCache>,
}

impl fmt::Debug for FinancialDatasetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinancialDatasetsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FinancialDatasetsClient {
    /// Create a client that talks to the API over `reqwest`.
    #[must_use]
    pub fn new(config: FdsConfig, cache: Arc<dyn DataCache>) -> Self {
        Self::with_transport(config, cache, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client configured from the environment.
    ///
    /// See [`FdsConfig::from_env`].
    #[must_use]
    pub fn from_env(cache: Arc<dyn DataCache>) -> Self {
        Self::new(FdsConfig::from_env(), cache)
    }

    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_transport(
        config: FdsConfig,
        cache: Arc<dyn DataCache>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let executor = RequestExecutor::new(transport, config.max_retries, config.backoff);
        Self {
            executor,
            config,
            cache,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &FdsConfig {
        &self.config
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub(crate) const fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Headers for a call.
    ///
    /// The per-call key wins over the configured one, which wins over
    /// `FINANCIAL_DATASETS_API_KEY` as set when the call is made.
    pub(crate) fn headers(&self, api_key: Option<&str>) -> Result<HeaderMap> {
        let key = resolve_api_key(api_key, self.config.api_key.as_deref(), env_api_key);
        auth_headers(key.as_deref())
    }

    /// Send a request and parse the JSON response, failing on non-success status.
    async fn fetch<T: DeserializeOwned>(&self, ticker: &Ticker, request: ApiRequest) -> Result<T> {
        debug!(ticker = %ticker, url = %request.url, "Financial Datasets request");
        let response = self.executor.execute(&request).await?;
        if !response.is_success() {
            return Err(DataError::http(
                ticker.as_str(),
                response.status.as_u16(),
                response.body,
            ));
        }
        response.json()
    }

    /// Fetch daily prices between `start` and `end`.
    pub async fn prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<Vec<Price>> {
        let key = PriceKey::new(ticker.clone(), start, end);
        if let Some(cached) = self.cache.get_prices(&key).await? {
            return Ok(cached);
        }

        let url = format!(
            "{}/prices/?ticker={ticker}&interval=day&interval_multiplier=1&start_date={start}&end_date={end}",
            self.base_url()
        );
        let request = ApiRequest::get(url).with_headers(self.headers(api_key)?);
        let response: PriceResponse = self.fetch(ticker, request).await?;
        if response.prices.is_empty() {
            return Ok(Vec::new());
        }

        self.cache.put_prices(&key, &response.prices).await?;
        Ok(response.prices)
    }

    /// Fetch financial metrics reported on or before `end`.
    pub async fn financial_metrics(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        period: Period,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<FinancialMetrics>> {
        let key = MetricsKey::new(ticker.clone(), period, end, limit);
        if let Some(cached) = self.cache.get_financial_metrics(&key).await? {
            return Ok(cached);
        }

        let url = format!(
            "{}/financial-metrics/?ticker={ticker}&report_period_lte={end}&limit={limit}&period={period}",
            self.base_url()
        );
        let request = ApiRequest::get(url).with_headers(self.headers(api_key)?);
        let response: FinancialMetricsResponse = self.fetch(ticker, request).await?;
        if response.financial_metrics.is_empty() {
            return Ok(Vec::new());
        }

        self.cache
            .put_financial_metrics(&key, &response.financial_metrics)
            .await?;
        Ok(response.financial_metrics)
    }

    /// Search financial statement line items.
    ///
    /// Results are not cached and are truncated to `limit`.
    pub async fn search_line_items(
        &self,
        ticker: &Ticker,
        line_items: &[String],
        end: NaiveDate,
        period: Period,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<LineItem>> {
        let url = format!("{}/financials/search/line-items", self.base_url());
        let body = json!({
            "tickers": [ticker.as_str()],
            "line_items": line_items,
            "end_date": end.to_string(),
            "period": period.as_str(),
            "limit": limit,
        });
        let request = ApiRequest::post_json(url, body).with_headers(self.headers(api_key)?);
        let response: LineItemResponse = self.fetch(ticker, request).await?;

        let mut results = response.search_results;
        results.truncate(limit);
        Ok(results)
    }

    /// Fetch insider trades filed in `(start, end]`, walking back page by page.
    ///
    /// Without `start` only the most recent page is fetched.
    pub async fn insider_trades(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<InsiderTrade>> {
        let key = WindowKey::new(ticker.clone(), start, end, limit);
        if let Some(cached) = self.cache.get_insider_trades(&key).await? {
            return Ok(cached);
        }

        let trades = self
            .collect_pages::<InsiderTrades>(ticker, end, start, limit, api_key)
            .await?;
        if trades.is_empty() {
            return Ok(trades);
        }

        self.cache.put_insider_trades(&key, &trades).await?;
        Ok(trades)
    }

    /// Fetch company news published in `(start, end]`, walking back page by page.
    ///
    /// Without `start` only the most recent page is fetched.
    pub async fn company_news(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<CompanyNews>> {
        let key = WindowKey::new(ticker.clone(), start, end, limit);
        if let Some(cached) = self.cache.get_company_news(&key).await? {
            return Ok(cached);
        }

        let news = self
            .collect_pages::<News>(ticker, end, start, limit, api_key)
            .await?;
        if news.is_empty() {
            return Ok(news);
        }

        self.cache.put_company_news(&key, &news).await?;
        Ok(news)
    }

    /// Fetch company reference facts.
    pub async fn company_facts(
        &self,
        ticker: &Ticker,
        api_key: Option<&str>,
    ) -> Result<CompanyFacts> {
        let request = self.company_facts_request(ticker, api_key)?;
        let response: CompanyFactsResponse = self.fetch(ticker, request).await?;
        Ok(response.company_facts)
    }

    fn company_facts_request(&self, ticker: &Ticker, api_key: Option<&str>) -> Result<ApiRequest> {
        let url = format!("{}/company/facts/?ticker={ticker}", self.base_url());
        Ok(ApiRequest::get(url).with_headers(self.headers(api_key)?))
    }

    /// Fetch the market capitalization as of `end`.
    ///
    /// For today's date this reads the live figure from company facts; for past
    /// dates it uses the most recent TTM financial metrics.
    pub async fn market_cap(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<Option<f64>> {
        self.market_cap_as_of(ticker, end, Local::now().date_naive(), api_key)
            .await
    }

    pub(crate) async fn market_cap_as_of(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        today: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<Option<f64>> {
        if end == today {
            let request = self.company_facts_request(ticker, api_key)?;
            let response = self.executor.execute(&request).await?;
            if !response.is_success() {
                warn!(
                    ticker = %ticker,
                    status = response.status.as_u16(),
                    "Failed to fetch company facts"
                );
                return Ok(None);
            }
            let facts: CompanyFactsResponse = response.json()?;
            return Ok(facts.company_facts.market_cap);
        }

        let metrics = self
            .financial_metrics(ticker, end, Period::Ttm, MARKET_CAP_METRICS_LIMIT, api_key)
            .await?;
        Ok(metrics
            .first()
            .and_then(|m| m.market_cap)
            .filter(|cap| *cap != 0.0))
    }
}
