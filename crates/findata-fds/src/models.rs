// ============================================================================
// Financial Datasets API Response Types
// ============================================================================

use findata_core::{CompanyFacts, CompanyNews, FinancialMetrics, InsiderTrade, LineItem, Price};
use serde::Deserialize;

/// `GET /prices/` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PriceResponse {
    #[serde(default)]
    pub(crate) prices: Vec<Price>,
}

/// `GET /financial-metrics/` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FinancialMetricsResponse {
    #[serde(default)]
    pub(crate) financial_metrics: Vec<FinancialMetrics>,
}

/// `POST /financials/search/line-items` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LineItemResponse {
    #[serde(default)]
    pub(crate) search_results: Vec<LineItem>,
}

/// `GET /insider-trades/` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InsiderTradeResponse {
    #[serde(default)]
    pub(crate) insider_trades: Vec<InsiderTrade>,
}

impl From<InsiderTradeResponse> for Vec<InsiderTrade> {
    fn from(response: InsiderTradeResponse) -> Self {
        response.insider_trades
    }
}

/// `GET /news/` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CompanyNewsResponse {
    #[serde(default)]
    pub(crate) news: Vec<CompanyNews>,
}

impl From<CompanyNewsResponse> for Vec<CompanyNews> {
    fn from(response: CompanyNewsResponse) -> Self {
        response.news
    }
}

/// `GET /company/facts/` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CompanyFactsResponse {
    pub(crate) company_facts: CompanyFacts,
}
