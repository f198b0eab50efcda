//! 测试用的内存数据源

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::config::AppConfig;
use crate::models::{Fundamentals, NewsArticle, PriceBar, SearchQuote};
use crate::services::providers::{NewsSearch, PriceHistory, SymbolSearch};
use crate::state::AppState;

/// 使用默认配置和给定数据源装配应用状态
pub fn app_state(search: StubSearch, prices: StubPrices, news: StubNews) -> AppState {
    AppState::new(Arc::new(search), Arc::new(prices), Arc::new(news), &AppConfig::default())
}

/// 统计同时进行中的公司请求数
#[derive(Default)]
pub struct InFlightCounter {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl InFlightCounter {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: format!("2024-01-{:02}", i % 28 + 1),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        })
        .collect()
}

pub fn articles(n: usize) -> Vec<NewsArticle> {
    (0..n)
        .map(|i| NewsArticle {
            title: format!("headline {}", i),
            media: "Mint".to_string(),
            link: format!("https://example.com/{}", i),
            ..Default::default()
        })
        .collect()
}

pub fn quote(symbol: &str, longname: Option<&str>, shortname: Option<&str>, exchange: Option<&str>) -> SearchQuote {
    SearchQuote {
        symbol: symbol.to_string(),
        longname: longname.map(str::to_string),
        shortname: shortname.map(str::to_string),
        exchange: exchange.map(str::to_string),
    }
}

/// 代码搜索
///
/// 未指定固定结果时，对任意名称返回一个以名称为全称、NSI 交易所的候选
#[derive(Default)]
pub struct StubSearch {
    fixed: Option<Vec<SearchQuote>>,
    unknown: HashSet<String>,
    broken: HashSet<String>,
    panics: HashSet<String>,
    counter: Option<Arc<InFlightCounter>>,
}

impl StubSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quotes(quotes: Vec<SearchQuote>) -> Self {
        Self {
            fixed: Some(quotes),
            ..Self::default()
        }
    }

    /// 这些名称搜索不到任何候选
    pub fn unknown(mut self, names: &[&str]) -> Self {
        self.unknown.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// 这些名称搜索时请求失败
    pub fn broken(mut self, names: &[&str]) -> Self {
        self.broken.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// 这些名称搜索时直接 panic
    pub fn panics(mut self, names: &[&str]) -> Self {
        self.panics.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn tracked(mut self, counter: Arc<InFlightCounter>) -> Self {
        self.counter = Some(counter);
        self
    }
}

#[async_trait]
impl SymbolSearch for StubSearch {
    async fn search(&self, query: &str, max_results: usize, _country: &str) -> Result<Vec<SearchQuote>> {
        if let Some(counter) = &self.counter {
            counter.enter();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if self.panics.contains(query) {
            panic!("search exploded for {}", query);
        }
        if self.broken.contains(query) {
            return Err(anyhow!("connection reset"));
        }
        if self.unknown.contains(query) {
            return Ok(Vec::new());
        }

        let quotes = match &self.fixed {
            Some(quotes) => quotes.clone(),
            None => {
                let symbol: String = query.split_whitespace().collect::<String>().to_uppercase();
                vec![quote(&symbol, Some(query), None, Some("NSI"))]
            }
        };
        Ok(quotes.into_iter().take(max_results).collect())
    }
}

/// 行情
pub struct StubPrices {
    history: Vec<PriceBar>,
    fundamentals: Fundamentals,
    history_fails: bool,
    fundamentals_fail: bool,
}

impl StubPrices {
    pub fn with_closes(closes: &[f64]) -> Self {
        let mut fundamentals = Fundamentals::new();
        fundamentals.insert("sector".to_string(), serde_json::json!("Technology"));
        Self {
            history: bars(closes),
            fundamentals,
            history_fails: false,
            fundamentals_fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_closes(&[])
    }

    pub fn failing() -> Self {
        Self {
            history_fails: true,
            ..Self::with_closes(&[])
        }
    }

    pub fn without_fundamentals(mut self) -> Self {
        self.fundamentals_fail = true;
        self
    }
}

#[async_trait]
impl PriceHistory for StubPrices {
    async fn daily_history(&self, _ticker: &str, _period: &str, _interval: &str) -> Result<Vec<PriceBar>> {
        if self.history_fails {
            return Err(anyhow!("upstream timeout"));
        }
        Ok(self.history.clone())
    }

    async fn fundamentals(&self, _ticker: &str) -> Result<Fundamentals> {
        if self.fundamentals_fail {
            return Err(anyhow!("crumb rejected"));
        }
        Ok(self.fundamentals.clone())
    }
}

/// 新闻
#[derive(Default)]
pub struct StubNews {
    articles: Vec<NewsArticle>,
    failing: bool,
    counter: Option<Arc<InFlightCounter>>,
}

impl StubNews {
    pub fn with_articles(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn tracked(mut self, counter: Arc<InFlightCounter>) -> Self {
        self.counter = Some(counter);
        self
    }
}

#[async_trait]
impl NewsSearch for StubNews {
    async fn search(&self, _query: &str) -> Result<Vec<NewsArticle>> {
        if let Some(counter) = &self.counter {
            tokio::time::sleep(Duration::from_millis(20)).await;
            counter.exit();
        }
        if self.failing {
            return Err(anyhow!("HTTP 503"));
        }
        Ok(self.articles.clone())
    }
}
