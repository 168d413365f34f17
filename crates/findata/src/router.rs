//! Routing between the Financial Datasets API and the alternate-market source.

use std::sync::Arc;

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{debug, info};

use findata_core::{
    AlternateMarketSource, CompanyFacts, CompanyNews, DataCache, FinancialMetrics, InsiderTrade,
    LineItem, NotConfigured, Period, Price, Result, Ticker, prices_to_df,
};
use findata_fds::FinancialDatasetsClient;

/// Entry point for all data calls.
///
/// Hong Kong listings (see [`Ticker::is_alternate_market`]) are served by the
/// alternate-market source for prices, financial metrics, market cap and news.
/// Everything else, including insider trades and company facts for any
/// ticker, goes to the Financial Datasets API.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use findata::{FinancialData, InMemoryCache, Ticker};
///
/// let cache = Arc::new(InMemoryCache::new());
/// let data = FinancialData::from_env(cache.clone())
///     .with_futu(Arc::new(connector), cache);
///
/// let prices = data.prices(&Ticker::new("0700.HK"), start, end, None).await?;
/// ```
#[derive(Clone)]
pub struct FinancialData {
    client: FinancialDatasetsClient,
    alternate: Arc<dyn AlternateMarketSource>,
}

impl std::fmt::Debug for FinancialData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinancialData")
            .field("client", &self.client)
            .field("alternate", &self.alternate.name())
            .finish()
    }
}

impl FinancialData {
    /// Create a router with no alternate-market source configured.
    #[must_use]
    pub fn new(client: FinancialDatasetsClient) -> Self {
        Self {
            client,
            alternate: Arc::new(NotConfigured::new()),
        }
    }

    /// Create a router whose API client is configured from the environment.
    #[must_use]
    pub fn from_env(cache: Arc<dyn DataCache>) -> Self {
        Self::new(FinancialDatasetsClient::from_env(cache))
    }

    /// Serve Hong Kong listings from `source`.
    #[must_use]
    pub fn with_alternate(mut self, source: Arc<dyn AlternateMarketSource>) -> Self {
        debug!(source = source.name(), "Registering alternate-market source");
        self.alternate = source;
        self
    }

    /// Serve Hong Kong listings from a Futu OpenD terminal.
    #[cfg(feature = "futu")]
    #[must_use]
    pub fn with_futu(
        self,
        connector: Arc<dyn findata_futu::TerminalConnector>,
        cache: Arc<dyn DataCache>,
    ) -> Self {
        self.with_alternate(Arc::new(findata_futu::FutuSource::new(connector, cache)))
    }

    /// Returns the Financial Datasets client.
    #[must_use]
    pub const fn client(&self) -> &FinancialDatasetsClient {
        &self.client
    }

    /// Returns the alternate-market source.
    #[must_use]
    pub fn alternate(&self) -> &dyn AlternateMarketSource {
        self.alternate.as_ref()
    }

    fn routes_alternate(&self, ticker: &Ticker) -> bool {
        let alternate = ticker.is_alternate_market();
        if alternate {
            debug!(ticker = %ticker, source = self.alternate.name(), "Routing to alternate source");
        }
        alternate
    }

    /// Fetch daily prices between `start` and `end`.
    pub async fn prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<Vec<Price>> {
        if self.routes_alternate(ticker) {
            return self.alternate.prices(ticker, start, end).await;
        }
        self.client.prices(ticker, start, end, api_key).await
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
        if self.routes_alternate(ticker) {
            return self
                .alternate
                .financial_metrics(ticker, end, period, limit)
                .await;
        }
        self.client
            .financial_metrics(ticker, end, period, limit, api_key)
            .await
    }

    /// Search financial statement line items.
    ///
    /// Hong Kong listings have no line-item data and yield an empty list.
    pub async fn search_line_items(
        &self,
        ticker: &Ticker,
        line_items: &[String],
        end: NaiveDate,
        period: Period,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<LineItem>> {
        if ticker.is_alternate_market() {
            info!(ticker = %ticker, "Line item search is not supported for Hong Kong listings");
            return Ok(Vec::new());
        }
        self.client
            .search_line_items(ticker, line_items, end, period, limit, api_key)
            .await
    }

    /// Fetch insider trades filed in `(start, end]`.
    pub async fn insider_trades(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<InsiderTrade>> {
        self.client
            .insider_trades(ticker, end, start, limit, api_key)
            .await
    }

    /// Fetch company news published in `(start, end]`.
    pub async fn company_news(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
        api_key: Option<&str>,
    ) -> Result<Vec<CompanyNews>> {
        if self.routes_alternate(ticker) {
            return self.alternate.company_news(ticker, end, start, limit).await;
        }
        self.client
            .company_news(ticker, end, start, limit, api_key)
            .await
    }

    /// Fetch company reference facts.
    pub async fn company_facts(
        &self,
        ticker: &Ticker,
        api_key: Option<&str>,
    ) -> Result<CompanyFacts> {
        self.client.company_facts(ticker, api_key).await
    }

    /// Fetch the market capitalization as of `end`.
    pub async fn market_cap(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<Option<f64>> {
        if self.routes_alternate(ticker) {
            return self.alternate.market_cap(ticker, end).await;
        }
        self.client.market_cap(ticker, end, api_key).await
    }

    /// Fetch daily prices as a [`DataFrame`] sorted by date.
    pub async fn price_data(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
        api_key: Option<&str>,
    ) -> Result<DataFrame> {
        let prices = self.prices(ticker, start, end, api_key).await?;
        prices_to_df(&prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use findata_cache::InMemoryCache;
    use findata_core::DataError;
    use findata_fds::FdsConfig;
    use findata_fds::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingSource {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingSource {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AlternateMarketSource for RecordingSource {
        fn name(&self) -> &str {
            "recording"
        }

        async fn prices(
            &self,
            _ticker: &Ticker,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Price>> {
            self.record("prices");
            Ok(vec![
                Price {
                    open: 290.0,
                    close: 292.0,
                    high: 295.0,
                    low: 288.0,
                    volume: 1_000,
                    time: "2024-01-03T00:00:00".to_string(),
                },
                Price {
                    open: 288.0,
                    close: 290.0,
                    high: 291.0,
                    low: 286.0,
                    volume: 2_000,
                    time: "2024-01-02T00:00:00".to_string(),
                },
            ])
        }

        async fn financial_metrics(
            &self,
            ticker: &Ticker,
            end: NaiveDate,
            period: Period,
            _limit: usize,
        ) -> Result<Vec<FinancialMetrics>> {
            self.record("financial_metrics");
            Ok(vec![FinancialMetrics::new(
                ticker.as_str(),
                end.to_string(),
                period.as_str(),
                "HKD",
            )])
        }

        async fn market_cap(&self, _ticker: &Ticker, _end: NaiveDate) -> Result<Option<f64>> {
            self.record("market_cap");
            Ok(None)
        }

        async fn company_news(
            &self,
            _ticker: &Ticker,
            _end: NaiveDate,
            _start: Option<NaiveDate>,
            _limit: usize,
        ) -> Result<Vec<CompanyNews>> {
            self.record("company_news");
            Ok(Vec::new())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn router() -> (FinancialData, Arc<ScriptedTransport>, Arc<RecordingSource>) {
        let transport = Arc::new(ScriptedTransport::new());
        let client = FinancialDatasetsClient::with_transport(
            FdsConfig::default().with_base_url("http://fds.test"),
            Arc::new(InMemoryCache::new()),
            transport.clone(),
        );
        let source = Arc::new(RecordingSource::default());
        let data = FinancialData::new(client).with_alternate(source.clone());
        (data, transport, source)
    }

    #[tokio::test]
    async fn test_us_ticker_uses_api() {
        let (data, transport, source) = router();
        transport.push_json(json!({
            "prices": [{
                "open": 187.15, "close": 185.64, "high": 188.44, "low": 183.89,
                "volume": 82488700, "time": "2024-01-02T05:00:00Z"
            }]
        }));

        let prices = data
            .prices(&Ticker::new("AAPL"), date(2024, 1, 1), date(2024, 1, 31), None)
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(transport.request_count(), 1);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_hong_kong_ticker_uses_alternate_source() {
        let (data, transport, source) = router();
        let ticker = Ticker::new("0700.HK");

        data.prices(&ticker, date(2024, 1, 1), date(2024, 1, 31), None)
            .await
            .unwrap();
        let metrics = data
            .financial_metrics(&ticker, date(2024, 1, 31), Period::Ttm, 10, None)
            .await
            .unwrap();
        data.market_cap(&ticker, date(2024, 1, 31), None).await.unwrap();
        data.company_news(&Ticker::new("00700"), date(2024, 1, 31), None, 10, None)
            .await
            .unwrap();

        assert_eq!(metrics[0].currency, "HKD");
        assert_eq!(
            source.calls(),
            vec!["prices", "financial_metrics", "market_cap", "company_news"]
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_insider_trades_and_facts_always_use_api() {
        let (data, transport, source) = router();
        transport.push_json(json!({ "insider_trades": [] }));
        transport.push_json(json!({ "company_facts": { "ticker": "0700.HK", "name": "Tencent" } }));

        let ticker = Ticker::new("0700.HK");
        let trades = data
            .insider_trades(&ticker, date(2024, 1, 31), None, 100, None)
            .await
            .unwrap();
        let facts = data.company_facts(&ticker, None).await.unwrap();

        assert!(trades.is_empty());
        assert_eq!(facts.name, "Tencent");
        assert_eq!(transport.request_count(), 2);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_line_items_unsupported_for_hong_kong() {
        let (data, transport, _source) = router();

        let items = data
            .search_line_items(
                &Ticker::new("9988.HK"),
                &["revenue".to_string()],
                date(2024, 1, 31),
                Period::Ttm,
                10,
                None,
            )
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_alternate_source_fails() {
        let client = FinancialDatasetsClient::with_transport(
            FdsConfig::default(),
            Arc::new(InMemoryCache::new()),
            Arc::new(ScriptedTransport::new()),
        );
        let data = FinancialData::new(client);
        assert_eq!(data.alternate().name(), "not-configured");

        let err = data
            .prices(&Ticker::new("0700.HK"), date(2024, 1, 1), date(2024, 1, 31), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::ProviderNotConfigured(_)));
    }

    #[tokio::test]
    async fn test_price_data_sorted_frame() {
        let (data, _transport, _source) = router();

        let df = data
            .price_data(&Ticker::new("00700"), date(2024, 1, 1), date(2024, 1, 31), None)
            .await
            .unwrap();
        assert_eq!(df.height(), 2);
        let volume = df.column("volume").unwrap().i64().unwrap();
        assert_eq!(volume.get(0), Some(2_000));
        assert_eq!(volume.get(1), Some(1_000));
    }
}
