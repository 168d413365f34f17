//! Hong Kong source over a quote terminal.

use async_trait::async_trait;
use chrono::NaiveDate;
use findata_core::{
    AlternateMarketSource, CompanyNews, DataCache, FinancialMetrics, MetricsKey, Period, Price,
    PriceKey, Result, Ticker, WindowKey,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::terminal::{KlineBar, NewsItem, QuoteTerminal, TerminalConnector};

/// Currency of every Hong Kong listing served here.
const HK_CURRENCY: &str = "HKD";

/// Terminal timestamp layout carried into [`Price::time`].
const KLINE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Convert a ticker to a terminal security code.
///
/// A `.HK` suffix is dropped and the numeric code is zero-padded to five digits.
///
/// ```
/// use findata_futu::to_terminal_code;
///
/// assert_eq!(to_terminal_code("700"), "HK.00700");
/// assert_eq!(to_terminal_code("0700.HK"), "HK.00700");
/// ```
#[must_use]
pub fn to_terminal_code(ticker: &str) -> String {
    let code = ticker.strip_suffix(".HK").unwrap_or(ticker);
    format!("HK.{code:0>5}")
}

/// First day of the news window when the caller gives none.
fn default_news_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

impl From<KlineBar> for Price {
    fn from(bar: KlineBar) -> Self {
        Self {
            open: bar.open,
            close: bar.close,
            high: bar.high,
            low: bar.low,
            volume: bar.volume,
            time: bar.time_key.format(KLINE_TIME_FORMAT).to_string(),
        }
    }
}

fn news_record(ticker: &Ticker, item: NewsItem) -> CompanyNews {
    CompanyNews {
        ticker: ticker.to_string(),
        title: item.title,
        author: item.author,
        source: item.source,
        date: item.time,
        url: item.url,
        sentiment: None,
    }
}

/// Alternate-market source backed by a Futu OpenD terminal.
///
/// A fresh session is opened for every call that needs the terminal and closed
/// when the call returns. Query failures inside a session are logged and
/// reported as empty results; a failed connection is returned as an error.
#[derive(Clone)]
pub struct FutuSource {
    connector: Arc<dyn TerminalConnector>,
    cache: Arc<dyn DataCache>,
}

impl fmt::Debug for FutuSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutuSource")
            .field("connector", &self.connector)
            .finish_non_exhaustive()
    }
}

impl FutuSource {
    /// Create a source dialing through `connector`.
    #[must_use]
    pub fn new(connector: Arc<dyn TerminalConnector>, cache: Arc<dyn DataCache>) -> Self {
        Self { connector, cache }
    }

    async fn connect(&self) -> Result<Box<dyn QuoteTerminal>> {
        debug!(address = %self.connector.address(), "Connecting to quote terminal");
        self.connector.connect().await.inspect_err(|e| {
            warn!(address = %self.connector.address(), error = %e, "Quote terminal unreachable");
        })
    }
}

#[async_trait]
impl AlternateMarketSource for FutuSource {
    fn name(&self) -> &str {
        "futu"
    }

    async fn prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Price>> {
        let key = PriceKey::new(ticker.clone(), start, end);
        if let Some(cached) = self.cache.get_prices(&key).await? {
            return Ok(cached);
        }

        let code = to_terminal_code(ticker.as_str());
        let session = self.connect().await?;
        let bars = match session.daily_klines(&code, start, end).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(ticker = %ticker, code = %code, error = %e, "Failed to fetch Hong Kong prices");
                return Ok(Vec::new());
            }
        };
        if bars.is_empty() {
            return Ok(Vec::new());
        }

        let prices: Vec<Price> = bars.into_iter().map(Price::from).collect();
        self.cache.put_prices(&key, &prices).await?;
        Ok(prices)
    }

    async fn financial_metrics(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        period: Period,
        limit: usize,
    ) -> Result<Vec<FinancialMetrics>> {
        let key = MetricsKey::new(ticker.clone(), period, end, limit);
        if let Some(cached) = self.cache.get_financial_metrics(&key).await? {
            return Ok(cached);
        }

        // The terminal exposes no fundamentals; only the record identity is known.
        let metrics = vec![FinancialMetrics::new(
            ticker.as_str(),
            end.to_string(),
            period.as_str(),
            HK_CURRENCY,
        )];
        self.cache.put_financial_metrics(&key, &metrics).await?;
        Ok(metrics)
    }

    async fn market_cap(&self, ticker: &Ticker, _end: NaiveDate) -> Result<Option<f64>> {
        info!(ticker = %ticker, "Hong Kong market cap is not available from the quote terminal");
        Ok(None)
    }

    async fn company_news(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
        start: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<CompanyNews>> {
        let key = WindowKey::new(ticker.clone(), start, end, limit);
        if let Some(cached) = self.cache.get_company_news(&key).await? {
            return Ok(cached);
        }

        let code = to_terminal_code(ticker.as_str());
        let session = self.connect().await?;
        let start = start.unwrap_or_else(default_news_start);
        let items = match session.news(&code, start, end, limit).await {
            Ok(items) => items,
            Err(e) => {
                warn!(ticker = %ticker, code = %code, error = %e, "Failed to fetch Hong Kong news");
                return Ok(Vec::new());
            }
        };
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let news: Vec<CompanyNews> = items
            .into_iter()
            .map(|item| news_record(ticker, item))
            .collect();
        self.cache.put_company_news(&key, &news).await?;
        Ok(news)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::TerminalAddress;
    use findata_cache::InMemoryCache;
    use findata_core::DataError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Klines(String, NaiveDate, NaiveDate),
        News(String, NaiveDate, NaiveDate, usize),
    }

    struct FakeSession {
        bars: Vec<KlineBar>,
        news: Vec<NewsItem>,
        fail_queries: bool,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    #[async_trait]
    impl QuoteTerminal for FakeSession {
        async fn daily_klines(
            &self,
            code: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<KlineBar>> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Klines(code.to_string(), start, end));
            if self.fail_queries {
                return Err(DataError::Terminal("unknown stock".to_string()));
            }
            Ok(self.bars.clone())
        }

        async fn news(
            &self,
            code: &str,
            start: NaiveDate,
            end: NaiveDate,
            max_count: usize,
        ) -> Result<Vec<NewsItem>> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::News(code.to_string(), start, end, max_count));
            if self.fail_queries {
                return Err(DataError::Terminal("quota exceeded".to_string()));
            }
            Ok(self.news.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeConnector {
        address: TerminalAddress,
        unreachable: bool,
        fail_queries: bool,
        bars: Vec<KlineBar>,
        news: Vec<NewsItem>,
        connects: AtomicUsize,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    #[async_trait]
    impl TerminalConnector for FakeConnector {
        fn address(&self) -> &TerminalAddress {
            &self.address
        }

        async fn connect(&self) -> Result<Box<dyn QuoteTerminal>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                return Err(DataError::Terminal(format!(
                    "connection refused: {}",
                    self.address
                )));
            }
            Ok(Box::new(FakeSession {
                bars: self.bars.clone(),
                news: self.news.clone(),
                fail_queries: self.fail_queries,
                calls: self.calls.clone(),
            }))
        }
    }

    impl FakeConnector {
        fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(day: u32, close: f64) -> KlineBar {
        KlineBar {
            time_key: date(2024, 1, day).and_hms_opt(0, 0, 0).unwrap(),
            open: close - 1.0,
            close,
            high: close + 2.0,
            low: close - 2.0,
            volume: 12_345_678,
        }
    }

    fn source(connector: FakeConnector) -> (FutuSource, Arc<FakeConnector>, Arc<InMemoryCache>) {
        let connector = Arc::new(connector);
        let cache = Arc::new(InMemoryCache::new());
        let source = FutuSource::new(connector.clone(), cache.clone());
        (source, connector, cache)
    }

    #[test]
    fn test_to_terminal_code() {
        assert_eq!(to_terminal_code("700"), "HK.00700");
        assert_eq!(to_terminal_code("0700.HK"), "HK.00700");
        assert_eq!(to_terminal_code("00700"), "HK.00700");
        assert_eq!(to_terminal_code("9988.HK"), "HK.09988");
    }

    #[tokio::test]
    async fn test_prices_convert_bars_and_cache() {
        let (source, connector, cache) = source(FakeConnector {
            bars: vec![bar(2, 290.0), bar(3, 285.4)],
            ..Default::default()
        });
        let ticker = Ticker::new("0700.HK");

        let prices = source
            .prices(&ticker, date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].time, "2024-01-02T00:00:00");
        assert_eq!(prices[1].close, 285.4);
        assert_eq!(prices[1].volume, 12_345_678);
        assert_eq!(
            connector.calls(),
            vec![Call::Klines(
                "HK.00700".to_string(),
                date(2024, 1, 1),
                date(2024, 1, 31)
            )]
        );

        let again = source
            .prices(&ticker, date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(again, prices);
        assert_eq!(connector.connects(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_price_query_failure_yields_empty() {
        let (source, _connector, cache) = source(FakeConnector {
            fail_queries: true,
            ..Default::default()
        });

        let prices = source
            .prices(&Ticker::new("00700"), date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert!(prices.is_empty());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreachable_terminal_is_an_error() {
        let (source, _connector, _cache) = source(FakeConnector {
            unreachable: true,
            ..Default::default()
        });
        let ticker = Ticker::new("00700");

        let err = source
            .prices(&ticker, date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Terminal(_)));

        let err = source
            .company_news(&ticker, date(2024, 1, 31), None, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Terminal(_)));
    }

    #[tokio::test]
    async fn test_financial_metrics_placeholder() {
        let (source, connector, cache) = source(FakeConnector::default());

        let metrics = source
            .financial_metrics(&Ticker::new("0700.HK"), date(2024, 3, 31), Period::Annual, 5)
            .await
            .unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].ticker, "0700.HK");
        assert_eq!(metrics[0].report_period, "2024-03-31");
        assert_eq!(metrics[0].period, "annual");
        assert_eq!(metrics[0].currency, "HKD");
        assert_eq!(metrics[0].market_cap, None);
        assert_eq!(metrics[0].price_to_earnings_ratio, None);
        assert_eq!(connector.connects(), 0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_market_cap_unavailable() {
        let (source, connector, _cache) = source(FakeConnector::default());

        let cap = source
            .market_cap(&Ticker::new("00700"), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(cap, None);
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_news_defaults_window_start() {
        let (source, connector, cache) = source(FakeConnector {
            news: vec![NewsItem {
                title: "Tencent results beat estimates".to_string(),
                source: "HKEJ".to_string(),
                time: "2024-01-15 09:30:00".to_string(),
                url: "https://news.example/1".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        let ticker = Ticker::new("700");

        let news = source
            .company_news(&ticker, date(2024, 1, 31), None, 50)
            .await
            .unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].ticker, "700");
        assert_eq!(news[0].date, "2024-01-15 09:30:00");
        assert_eq!(news[0].sentiment, None);
        assert_eq!(
            connector.calls(),
            vec![Call::News(
                "HK.00700".to_string(),
                date(2020, 1, 1),
                date(2024, 1, 31),
                50
            )]
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_news_query_failure_yields_empty() {
        let (source, connector, cache) = source(FakeConnector {
            fail_queries: true,
            ..Default::default()
        });

        let news = source
            .company_news(&Ticker::new("00700"), date(2024, 1, 31), Some(date(2024, 1, 1)), 10)
            .await
            .unwrap();
        assert!(news.is_empty());
        assert_eq!(
            connector.calls(),
            vec![Call::News(
                "HK.00700".to_string(),
                date(2024, 1, 1),
                date(2024, 1, 31),
                10
            )]
        );
        assert!(cache.is_empty().await);
    }
}
