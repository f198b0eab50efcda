//! 外部数据源接口
//!
//! 管道只依赖这些 trait，具体实现（Yahoo Finance、Google News）在构造时注入，
//! 测试中替换为内存实现

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Fundamentals, NewsArticle, PriceBar, SearchQuote};

/// 代码搜索数据源
#[async_trait]
pub trait SymbolSearch: Send + Sync {
    /// 按公司名称搜索候选代码
    ///
    /// # 参数
    /// - query: 公司名称或部分代码
    /// - max_results: 最多返回的候选数
    /// - country: 偏向的国家市场
    async fn search(&self, query: &str, max_results: usize, country: &str) -> Result<Vec<SearchQuote>>;
}

/// 行情数据源
#[async_trait]
pub trait PriceHistory: Send + Sync {
    /// 获取日K线，按日期升序
    ///
    /// period 如 "1y"，interval 如 "1d"
    async fn daily_history(&self, ticker: &str, period: &str, interval: &str) -> Result<Vec<PriceBar>>;

    /// 获取公司基本面
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals>;
}

/// 新闻搜索数据源
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// 搜索新闻，按发布时间倒序
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>>;
}
