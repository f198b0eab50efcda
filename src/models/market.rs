//! 行情数据模型
//!
//! 定义代码搜索、日K线、技术指标及价格快照等结构

use serde::{Deserialize, Serialize};

/// 公司基本面数据
///
/// 字段集合由数据源决定，不固定结构
pub type Fundamentals = serde_json::Map<String, serde_json::Value>;

/// 代码搜索候选项
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SearchQuote {
    /// 原始代码（可能不带市场后缀）
    pub symbol: String,
    /// 公司全称
    pub longname: Option<String>,
    /// 公司简称
    pub shortname: Option<String>,
    /// 交易所代码（如 NSI、BSE）
    pub exchange: Option<String>,
}

impl SearchQuote {
    /// 用于模糊匹配的显示名称：优先全称，其次简称，都没有则为空串
    pub fn display_name(&self) -> &str {
        self.longname
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.shortname.as_deref())
            .unwrap_or("")
    }
}

/// 日K线数据
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceBar {
    /// 日期（YYYY-MM-DD）
    pub date: String,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量
    pub volume: u64,
}

/// 价格快照
///
/// 由日K线最后两根的收盘价计算
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    /// 最新价（最后一根收盘价）
    pub current_price: f64,
    /// 昨收（倒数第二根收盘价，不足两根时为 0）
    pub previous_close: f64,
    /// 涨跌额
    pub price_change: f64,
    /// 涨跌幅（百分比，昨收为 0 时为 0）
    pub percent_change: f64,
}

/// 技术指标集合
///
/// 每项取对应序列的最后一个值；历史长度不足时为 None（序列化为 null）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct TechnicalIndicators {
    /// RSI(14)
    pub rsi: Option<f64>,
    /// MACD 线 EMA(12) - EMA(26)
    pub macd: Option<f64>,
    /// MACD 信号线 EMA(9)
    pub macd_signal: Option<f64>,
    /// 布林带上轨 (20, +2σ)
    pub bollinger_upper: Option<f64>,
    /// 布林带下轨 (20, -2σ)
    pub bollinger_lower: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    /// 30日滚动年化波动率
    pub volatility_30d: Option<f64>,
}

/// 行情汇总：价格快照 + 技术指标 + 基本面
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StockSnapshot {
    #[serde(flatten)]
    pub price: PriceSnapshot,
    pub technical_indicators: TechnicalIndicators,
    pub fundamentals: Fundamentals,
}

/// 行情获取结果
///
/// 获取失败时只携带 error 字段，不影响同一公司的新闻获取
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum StockData {
    Available(StockSnapshot),
    Failed { error: String },
}

impl StockData {
    pub fn failed(error: impl Into<String>) -> Self {
        StockData::Failed { error: error.into() }
    }

    /// 行情内联错误信息
    pub fn error(&self) -> Option<&str> {
        match self {
            StockData::Available(_) => None,
            StockData::Failed { error } => Some(error),
        }
    }
}
