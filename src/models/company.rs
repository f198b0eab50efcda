//! 公司汇总数据模型

use serde::{Deserialize, Serialize};

use super::{NewsArticle, StockData};

/// 单家公司的汇总结果
///
/// 成功时 error 为空，其余字段有值；
/// 失败时只有 error 有值，ticker / stock_data / news 均为空，不会出现部分结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompanyData {
    /// 带市场后缀的代码
    pub ticker: Option<String>,
    /// 行情数据（可能内联 error）
    pub stock_data: Option<StockData>,
    /// 最新新闻
    pub news: Option<Vec<NewsArticle>>,
    /// 整体失败原因
    pub error: Option<String>,
}

impl CompanyData {
    pub fn success(ticker: String, stock_data: StockData, news: Vec<NewsArticle>) -> Self {
        Self {
            ticker: Some(ticker),
            stock_data: Some(stock_data),
            news: Some(news),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ticker: None,
            stock_data: None,
            news: None,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
