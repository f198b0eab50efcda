//! 行情与技术指标服务
//!
//! 获取一年日K线，计算技术指标和价格快照，并附带公司基本面。
//! 任何失败都转换为内联错误返回，不向调用方抛出

use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::{StockData, StockSnapshot};
use crate::services::indicators;
use crate::services::providers::PriceHistory;

const HISTORY_PERIOD: &str = "1y";
const HISTORY_INTERVAL: &str = "1d";

/// 行情与指标获取
#[derive(Clone)]
pub struct PriceIndicatorFetcher {
    source: Arc<dyn PriceHistory>,
}

impl PriceIndicatorFetcher {
    pub fn new(source: Arc<dyn PriceHistory>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, ticker: &str) -> StockData {
        log::info!("获取行情数据: {}", ticker);

        let bars = match self
            .source
            .daily_history(ticker, HISTORY_PERIOD, HISTORY_INTERVAL)
            .await
        {
            Ok(bars) => bars,
            Err(e) => return fetch_failed(ticker, e),
        };

        if bars.is_empty() {
            log::error!("No data found for {}", ticker);
            return StockData::failed(format!("No data found for {}", ticker));
        }

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let technical_indicators = indicators::compute(&closes);
        let price = match indicators::price_snapshot(&closes) {
            Some(price) => price,
            None => return StockData::failed(format!("No data found for {}", ticker)),
        };

        let fundamentals = match self.source.fundamentals(ticker).await {
            Ok(fundamentals) => fundamentals,
            Err(e) => return fetch_failed(ticker, e),
        };

        log::info!(
            "{} 最新价 {:.2}，涨跌幅 {:.2}%，共 {} 根K线",
            ticker,
            price.current_price,
            price.percent_change,
            bars.len()
        );

        StockData::Available(StockSnapshot {
            price,
            technical_indicators,
            fundamentals,
        })
    }
}

fn fetch_failed(ticker: &str, cause: anyhow::Error) -> StockData {
    let err = PipelineError::Fetch {
        ticker: ticker.to_string(),
        reason: cause.to_string(),
    };
    log::error!("{}", err);
    StockData::failed(err.to_string())
}

// ==================== 测试模块 ====================
