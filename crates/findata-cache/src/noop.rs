//! Cache that never stores anything.

use async_trait::async_trait;
use findata_core::{
    CompanyNews, DataCache, FinancialMetrics, InsiderTrade, MetricsKey, Price, PriceKey, Result,
    WindowKey,
};
use tracing::trace;

/// Cache that forgets every write.
///
/// Lookups always miss, so every call reaches the API or the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create the cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataCache for NoopCache {
    async fn get_prices(&self, key: &PriceKey) -> Result<Option<Vec<Price>>> {
        trace!(key = %key, "Cache disabled, get_prices misses");
        Ok(None)
    }

    async fn put_prices(&self, key: &PriceKey, _prices: &[Price]) -> Result<()> {
        trace!(key = %key, "Cache disabled, put_prices dropped");
        Ok(())
    }

    async fn get_financial_metrics(
        &self,
        key: &MetricsKey,
    ) -> Result<Option<Vec<FinancialMetrics>>> {
        trace!(key = %key, "Cache disabled, get_financial_metrics misses");
        Ok(None)
    }

    async fn put_financial_metrics(
        &self,
        key: &MetricsKey,
        _metrics: &[FinancialMetrics],
    ) -> Result<()> {
        trace!(key = %key, "Cache disabled, put_financial_metrics dropped");
        Ok(())
    }

    async fn get_insider_trades(&self, key: &WindowKey) -> Result<Option<Vec<InsiderTrade>>> {
        trace!(key = %key, "Cache disabled, get_insider_trades misses");
        Ok(None)
    }

    async fn put_insider_trades(&self, key: &WindowKey, _trades: &[InsiderTrade]) -> Result<()> {
        trace!(key = %key, "Cache disabled, put_insider_trades dropped");
        Ok(())
    }

    async fn get_company_news(&self, key: &WindowKey) -> Result<Option<Vec<CompanyNews>>> {
        trace!(key = %key, "Cache disabled, get_company_news misses");
        Ok(None)
    }

    async fn put_company_news(&self, key: &WindowKey, _news: &[CompanyNews]) -> Result<()> {
        trace!(key = %key, "Cache disabled, put_company_news dropped");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        trace!("Nothing to clear");
        Ok(())
    }
}
