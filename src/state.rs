//! 应用共享状态
//!
//! 启动时装配数据源和各服务，通过 web::Data 注入到处理器中

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::news::NewsFetcher;
use crate::services::price_service::PriceIndicatorFetcher;
use crate::services::providers::{NewsSearch, PriceHistory, SymbolSearch};
use crate::services::ticker_service::TickerResolver;
use crate::services::{CompanyDataAggregator, WatchlistFanOut};

pub struct AppState {
    pub aggregator: Arc<CompanyDataAggregator>,
    pub watchlist: WatchlistFanOut,
    /// 首屏同步加载的公司数
    pub initial_load_limit: usize,
}

impl AppState {
    pub fn new(
        search: Arc<dyn SymbolSearch>,
        prices: Arc<dyn PriceHistory>,
        news: Arc<dyn NewsSearch>,
        config: &AppConfig,
    ) -> Self {
        let resolver = TickerResolver::new(search, config.market.country.clone(), config.market.quotes_count);
        let aggregator = Arc::new(CompanyDataAggregator::new(
            resolver,
            PriceIndicatorFetcher::new(prices),
            NewsFetcher::new(news),
            config.watchlist.news_limit,
        ));
        let watchlist = WatchlistFanOut::new(aggregator.clone(), config.watchlist.concurrency);

        Self {
            aggregator,
            watchlist,
            initial_load_limit: config.watchlist.initial_load_limit,
        }
    }
}
