//! 代码解析服务
//!
//! 将公司名称解析为带市场后缀的代码：搜索候选 -> 模糊匹配名称 -> 按交易所追加后缀

use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};
use crate::services::fuzzy;
use crate::services::providers::SymbolSearch;

/// 未识别的交易所默认使用 NSE 后缀
pub const DEFAULT_SUFFIX: &str = ".NS";

/// 交易所代码 -> 市场后缀
pub fn exchange_suffix(exchange: &str) -> &'static str {
    match exchange {
        "NSI" | "NSE" => ".NS",
        "BOM" | "BSE" => ".BO",
        _ => DEFAULT_SUFFIX,
    }
}

/// 代码解析器
#[derive(Clone)]
pub struct TickerResolver {
    search: Arc<dyn SymbolSearch>,
    country: String,
    quotes_count: usize,
}

impl TickerResolver {
    pub fn new(search: Arc<dyn SymbolSearch>, country: impl Into<String>, quotes_count: usize) -> Self {
        Self {
            search,
            country: country.into(),
            quotes_count,
        }
    }

    /// 解析公司名称
    ///
    /// 搜索无结果返回 NotFound；匹配到的候选没有名称时返回 NoMatch
    pub async fn resolve(&self, query: &str) -> PipelineResult<String> {
        let quotes = self
            .search
            .search(query, self.quotes_count, &self.country)
            .await?;

        if quotes.is_empty() {
            log::warn!("代码搜索无结果: '{}'", query);
            return Err(PipelineError::NotFound(query.to_string()));
        }

        let names: Vec<&str> = quotes.iter().map(|q| q.display_name()).collect();
        let (index, score) = match fuzzy::extract_one(query, &names) {
            Some((index, score)) if !names[index].is_empty() => (index, score),
            _ => return Err(PipelineError::NoMatch(query.to_string())),
        };

        let quote = &quotes[index];
        let exchange = quote.exchange.as_deref().unwrap_or_default().to_uppercase();
        let suffix = exchange_suffix(&exchange);

        let mut ticker = quote.symbol.clone();
        if !ticker.ends_with(suffix) {
            ticker.push_str(suffix);
        }

        log::info!(
            "代码解析: '{}' -> {} (匹配 '{}', 得分 {}, 交易所 {})",
            query, ticker, names[index], score, exchange
        );
        Ok(ticker)
    }
}

// ==================== 测试模块 ====================
