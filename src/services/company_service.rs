//! 单家公司数据汇总
//!
//! 解析代码 -> 获取行情指标 -> 获取新闻。
//! 代码解析或新闻失败时整条记录失败；行情失败只内联在 stock_data 中

use crate::error::PipelineResult;
use crate::models::CompanyData;
use crate::services::news::NewsFetcher;
use crate::services::price_service::PriceIndicatorFetcher;
use crate::services::ticker_service::TickerResolver;

/// 公司数据汇总器
pub struct CompanyDataAggregator {
    resolver: TickerResolver,
    prices: PriceIndicatorFetcher,
    news: NewsFetcher,
    news_limit: usize,
}

impl CompanyDataAggregator {
    pub fn new(
        resolver: TickerResolver,
        prices: PriceIndicatorFetcher,
        news: NewsFetcher,
        news_limit: usize,
    ) -> Self {
        Self {
            resolver,
            prices,
            news,
            news_limit,
        }
    }

    pub fn resolver(&self) -> &TickerResolver {
        &self.resolver
    }

    /// 汇总一家公司的数据，不会失败，错误写入 error 字段
    pub async fn aggregate(&self, company_name: &str) -> CompanyData {
        match self.try_aggregate(company_name).await {
            Ok(data) => data,
            Err(e) => {
                log::error!("汇总 '{}' 失败: {}", company_name, e);
                CompanyData::failed(e.to_string())
            }
        }
    }

    async fn try_aggregate(&self, company_name: &str) -> PipelineResult<CompanyData> {
        let ticker = self.resolver.resolve(company_name).await?;

        let stock_data = self.prices.fetch(&ticker).await;
        if let Some(error) = stock_data.error() {
            log::warn!("{} 行情不可用: {}", ticker, error);
        }

        let mut news = self.news.fetch(company_name).await?;
        news.truncate(self.news_limit);

        Ok(CompanyData::success(ticker, stock_data, news))
    }
}

// ==================== 测试模块 ====================
