//! In-memory cache implementation.

use async_trait::async_trait;
use findata_core::{
    CompanyNews, DataCache, FinancialMetrics, InsiderTrade, MetricsKey, Price, PriceKey, Result,
    WindowKey,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Exact-match in-memory cache.
///
/// Data is stored in `RwLock`-protected `HashMap`s keyed by the structured keys
/// from `findata-core` and is lost when the cache is dropped. Entries are never
/// expired. Values are cloned on get/put so callers never alias stored state.
///
/// Concurrent writers for the same key are last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    prices: RwLock<HashMap<PriceKey, Vec<Price>>>,
    financial_metrics: RwLock<HashMap<MetricsKey, Vec<FinancialMetrics>>>,
    insider_trades: RwLock<HashMap<WindowKey, Vec<InsiderTrade>>>,
    company_news: RwLock<HashMap<WindowKey, Vec<CompanyNews>>>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of cached entries across all kinds.
    pub async fn len(&self) -> usize {
        self.prices.read().await.len()
            + self.financial_metrics.read().await.len()
            + self.insider_trades.read().await.len()
            + self.company_news.read().await.len()
    }

    /// Returns true if nothing has been cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DataCache for InMemoryCache {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn get_prices(&self, key: &PriceKey) -> Result<Option<Vec<Price>>> {
        let cache = self.prices.read().await;
        match cache.get(key) {
            Some(entry) => {
                debug!("Cache hit for prices");
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("Cache miss for prices");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, prices), fields(key = %key, count = prices.len()))]
    async fn put_prices(&self, key: &PriceKey, prices: &[Price]) -> Result<()> {
        self.prices.write().await.insert(key.clone(), prices.to_vec());
        debug!("Cached prices");
        Ok(())
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn get_financial_metrics(
        &self,
        key: &MetricsKey,
    ) -> Result<Option<Vec<FinancialMetrics>>> {
        let cache = self.financial_metrics.read().await;
        match cache.get(key) {
            Some(entry) => {
                debug!("Cache hit for financial metrics");
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("Cache miss for financial metrics");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, metrics), fields(key = %key, count = metrics.len()))]
    async fn put_financial_metrics(
        &self,
        key: &MetricsKey,
        metrics: &[FinancialMetrics],
    ) -> Result<()> {
        self.financial_metrics
            .write()
            .await
            .insert(key.clone(), metrics.to_vec());
        debug!("Cached financial metrics");
        Ok(())
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn get_insider_trades(&self, key: &WindowKey) -> Result<Option<Vec<InsiderTrade>>> {
        let cache = self.insider_trades.read().await;
        match cache.get(key) {
            Some(entry) => {
                debug!("Cache hit for insider trades");
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("Cache miss for insider trades");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, trades), fields(key = %key, count = trades.len()))]
    async fn put_insider_trades(&self, key: &WindowKey, trades: &[InsiderTrade]) -> Result<()> {
        self.insider_trades
            .write()
            .await
            .insert(key.clone(), trades.to_vec());
        debug!("Cached insider trades");
        Ok(())
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn get_company_news(&self, key: &WindowKey) -> Result<Option<Vec<CompanyNews>>> {
        let cache = self.company_news.read().await;
        match cache.get(key) {
            Some(entry) => {
                debug!("Cache hit for company news");
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("Cache miss for company news");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, key, news), fields(key = %key, count = news.len()))]
    async fn put_company_news(&self, key: &WindowKey, news: &[CompanyNews]) -> Result<()> {
        self.company_news
            .write()
            .await
            .insert(key.clone(), news.to_vec());
        debug!("Cached company news");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.prices.write().await.clear();
        self.financial_metrics.write().await.clear();
        self.insider_trades.write().await.clear();
        self.company_news.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use findata_core::{Period, Ticker};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn news(date: &str) -> CompanyNews {
        CompanyNews {
            ticker: "AAPL".to_string(),
            title: "Apple ships".to_string(),
            author: "Reporter".to_string(),
            source: "Wire".to_string(),
            date: date.to_string(),
            url: "https://example.com/a".to_string(),
            sentiment: None,
        }
    }

    #[tokio::test]
    async fn test_memory_cache_prices() {
        let cache = InMemoryCache::new();
        let key = PriceKey::new(Ticker::new("AAPL"), date(2024, 1, 1), date(2024, 1, 5));

        // Initially no data
        assert!(cache.get_prices(&key).await.unwrap().is_none());

        let prices = vec![Price {
            open: 150.0,
            close: 151.0,
            high: 152.0,
            low: 149.0,
            volume: 1_000_000,
            time: "2024-01-02T05:00:00Z".to_string(),
        }];
        cache.put_prices(&key, &prices).await.unwrap();

        let result = cache.get_prices(&key).await.unwrap();
        assert_eq!(result, Some(prices));
    }

    #[tokio::test]
    async fn test_memory_cache_is_exact_match() {
        let cache = InMemoryCache::new();
        let ticker = Ticker::new("AAPL");
        let stored = WindowKey::new(ticker.clone(), Some(date(2024, 1, 1)), date(2024, 1, 31), 2);
        cache
            .put_company_news(&stored, &[news("2024-01-20")])
            .await
            .unwrap();

        // Sub-range and different limit do not hit
        let narrower = WindowKey::new(ticker.clone(), Some(date(2024, 1, 10)), date(2024, 1, 31), 2);
        let other_limit = WindowKey::new(ticker.clone(), Some(date(2024, 1, 1)), date(2024, 1, 31), 3);
        let no_start = WindowKey::new(ticker, None, date(2024, 1, 31), 2);
        assert!(cache.get_company_news(&narrower).await.unwrap().is_none());
        assert!(cache.get_company_news(&other_limit).await.unwrap().is_none());
        assert!(cache.get_company_news(&no_start).await.unwrap().is_none());

        // News and trades live in separate maps
        assert!(cache.get_insider_trades(&stored).await.unwrap().is_none());
        assert_eq!(cache.get_company_news(&stored).await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_cache_returns_independent_copies() {
        let cache = InMemoryCache::new();
        let key = WindowKey::new(Ticker::new("AAPL"), None, date(2024, 1, 31), 10);
        cache.put_company_news(&key, &[news("2024-01-20")]).await.unwrap();

        let mut first = cache.get_company_news(&key).await.unwrap().unwrap();
        first[0].title = "mutated".to_string();
        first.clear();

        let second = cache.get_company_news(&key).await.unwrap().unwrap();
        assert_eq!(second, vec![news("2024-01-20")]);
    }

    #[tokio::test]
    async fn test_memory_cache_metrics() {
        let cache = InMemoryCache::new();
        let key = MetricsKey::new(Ticker::new("AAPL"), Period::Ttm, date(2024, 1, 15), 10);

        let metrics = FinancialMetrics {
            market_cap: Some(3_000_000_000_000.0),
            price_to_earnings_ratio: Some(28.5),
            ..FinancialMetrics::new("AAPL", "2023-12-30", "ttm", "USD")
        };
        cache.put_financial_metrics(&key, &[metrics]).await.unwrap();

        let retrieved = cache.get_financial_metrics(&key).await.unwrap().unwrap();
        assert_eq!(retrieved[0].market_cap, Some(3_000_000_000_000.0));
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = InMemoryCache::new();
        let key = WindowKey::new(Ticker::new("AAPL"), None, date(2024, 1, 31), 10);
        cache.put_company_news(&key, &[news("2024-01-20")]).await.unwrap();
        assert_eq!(cache.len().await, 1);

        cache.clear().await.unwrap();

        assert!(cache.is_empty().await);
        assert!(cache.get_company_news(&key).await.unwrap().is_none());
    }
}
