//! 业务逻辑服务模块
//!
//! 数据源对接、指标计算以及公司数据汇总

pub mod company_service;   // 单家公司汇总
pub mod fuzzy;             // 模糊匹配
pub mod indicators;        // 技术指标
pub mod market;            // 行情数据源
pub mod news;              // 新闻数据源
pub mod price_service;     // 行情与指标
pub mod providers;         // 数据源接口
pub mod ticker_service;    // 代码解析
pub mod watchlist_service; // 自选股批量获取

#[cfg(test)]
pub mod testing;

pub use company_service::CompanyDataAggregator;
pub use watchlist_service::WatchlistFanOut;
