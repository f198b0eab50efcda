//! Yahoo Finance 行情接口实现
//!
//! 提供代码搜索、日K线、公司基本面数据
//! 对接 https://query2.finance.yahoo.com 和 https://query1.finance.yahoo.com

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Asia::Kolkata;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::{ApiConfig, MarketConfig};
use crate::models::{Fundamentals, PriceBar, SearchQuote};
use crate::services::providers::{PriceHistory, SymbolSearch};

const YAHOO_REFERER: &str = "https://finance.yahoo.com/";

/// 基本面接口请求的模块，结果会被合并成一个扁平的键值表
///
/// 多个模块有同名字段时，按此顺序靠前的模块优先
const QUOTE_SUMMARY_MODULES: &[&str] = &[
    "assetProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "price",
    "quoteType",
];

/// Yahoo Finance 数据源
///
/// 基本面接口需要会话 Cookie + crumb，首次调用时获取，失效（401/403）后重新获取一次
pub struct YahooFinance {
    client: Client,
    config: MarketConfig,
    crumb: Mutex<Option<String>>,
}

impl YahooFinance {
    pub fn new(config: MarketConfig, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .timeout(api.timeout())
            .connect_timeout(api.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            crumb: Mutex::new(None),
        })
    }

    /// 获取 crumb（带会话缓存）
    async fn crumb(&self) -> Result<String> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        // 该地址通常返回 404，只需要它下发的 Cookie
        if let Err(e) = self.client.get(&self.config.cookie_url).send().await {
            log::warn!("获取 Yahoo 会话 Cookie 失败: {}", e);
        }

        let response = self
            .client
            .get(&self.config.crumb_url)
            .header("Referer", YAHOO_REFERER)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取 crumb 失败: {}", response.status()));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(anyhow!("crumb 内容无效"));
        }

        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    async fn request_quote_summary(&self, ticker: &str) -> Result<(StatusCode, String)> {
        let crumb = self.crumb().await?;
        let modules = QUOTE_SUMMARY_MODULES.join(",");
        let url = format!("{}/{}", self.config.quote_summary_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", modules.as_str()), ("crumb", crumb.as_str())])
            .header("Referer", YAHOO_REFERER)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl SymbolSearch for YahooFinance {
    async fn search(&self, query: &str, max_results: usize, country: &str) -> Result<Vec<SearchQuote>> {
        log::debug!("请求代码搜索: {}", query);
        let count = max_results.to_string();

        let response = self
            .client
            .get(&self.config.search_url)
            .query(&[
                ("q", query),
                ("quotesCount", count.as_str()),
                ("country", country),
            ])
            .header("Referer", YAHOO_REFERER)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("代码搜索失败: {}", response.status()));
        }

        let text = response.text().await?;
        parse_search_response(&text)
    }
}

#[async_trait]
impl PriceHistory for YahooFinance {
    async fn daily_history(&self, ticker: &str, period: &str, interval: &str) -> Result<Vec<PriceBar>> {
        let url = format!("{}/{}", self.config.chart_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval), ("includePrePost", "false")])
            .header("Referer", YAHOO_REFERER)
            .send()
            .await?;

        // 代码不存在或已退市时接口返回 404，按无数据处理
        if response.status() == StatusCode::NOT_FOUND {
            log::warn!("{} 没有K线数据（404）", ticker);
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(anyhow!("获取K线数据失败: {}", response.status()));
        }

        let text = response.text().await?;
        parse_chart_response(&text)
    }

    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let (mut status, mut text) = self.request_quote_summary(ticker).await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("Yahoo crumb 已失效，重新获取");
            self.invalidate_crumb().await;
            (status, text) = self.request_quote_summary(ticker).await?;
        }

        if !status.is_success() {
            return Err(anyhow!("获取基本面数据失败: {}", status));
        }

        parse_quote_summary_response(&text)
    }
}

// ==================== 响应结构 ====================

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchQuote {
    symbol: Option<String>,
    longname: Option<String>,
    shortname: Option<String>,
    exchange: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<serde_json::Map<String, Value>>>,
    #[serde(default)]
    error: Option<Value>,
}

// ==================== 解析函数 ====================

/// 取 Yahoo 错误对象里的描述文字
fn describe_error(error: &Value) -> String {
    error["description"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// 解析代码搜索结果，丢弃没有代码的条目
fn parse_search_response(data: &str) -> Result<Vec<SearchQuote>> {
    let response: YahooSearchResponse =
        serde_json::from_str(data).map_err(|e| anyhow!("解析搜索结果失败: {}", e))?;

    Ok(response
        .quotes
        .into_iter()
        .filter_map(|quote| {
            Some(SearchQuote {
                symbol: quote.symbol?,
                longname: quote.longname,
                shortname: quote.shortname,
                exchange: quote.exchange,
            })
        })
        .collect())
}

/// 解析日K线，跳过收盘价缺失的交易日
fn parse_chart_response(data: &str) -> Result<Vec<PriceBar>> {
    let response: YahooChartResponse =
        serde_json::from_str(data).map_err(|e| anyhow!("解析K线数据失败: {}", e))?;

    if let Some(error) = response.chart.error.as_ref().filter(|e| !e.is_null()) {
        return Err(anyhow!("K线接口返回错误: {}", describe_error(error)));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut history = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let Some(time) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };
        let field = |values: &Vec<Option<f64>>| values.get(i).copied().flatten().unwrap_or(close);

        history.push(PriceBar {
            date: time.with_timezone(&Kolkata).format("%Y-%m-%d").to_string(),
            open: field(&quote.open),
            high: field(&quote.high),
            low: field(&quote.low),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(history)
}

/// 解析基本面数据
///
/// 各模块字段合并到同一层；`{"raw": .., "fmt": ..}` 形式的数值只保留 raw，空对象丢弃。
/// 同名字段取 `QUOTE_SUMMARY_MODULES` 中靠前的模块，未列出的模块排在最后
fn parse_quote_summary_response(data: &str) -> Result<Fundamentals> {
    let response: YahooQuoteSummaryResponse =
        serde_json::from_str(data).map_err(|e| anyhow!("解析基本面数据失败: {}", e))?;

    if let Some(error) = response.quote_summary.error.as_ref().filter(|e| !e.is_null()) {
        return Err(anyhow!("基本面接口返回错误: {}", describe_error(error)));
    }

    let mut modules = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("基本面数据为空"))?;

    let mut ordered: Vec<Value> = QUOTE_SUMMARY_MODULES
        .iter()
        .filter_map(|name| modules.remove(*name))
        .collect();
    ordered.extend(modules.into_iter().map(|(_, module)| module));

    let mut fundamentals = Fundamentals::new();
    for module in ordered {
        let Value::Object(fields) = module else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" || fundamentals.contains_key(&key) {
                continue;
            }
            let value = match value {
                Value::Object(ref inner) if inner.contains_key("raw") => inner["raw"].clone(),
                Value::Object(ref inner) if inner.is_empty() => continue,
                other => other,
            };
            fundamentals.insert(key, value);
        }
    }

    Ok(fundamentals)
}

// ==================== 测试模块 ====================
