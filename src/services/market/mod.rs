//! 行情数据服务模块
//!
//! 提供代码搜索、日K线和基本面数据，当前数据源为 Yahoo Finance

pub mod yahoo;

pub use yahoo::YahooFinance;
