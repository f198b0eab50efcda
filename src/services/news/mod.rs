//! 新闻数据服务模块
//!
//! 按公司名称搜索新闻，数据源失败时统一转换为可重试提示

pub mod google;

use std::sync::Arc;

pub use google::GoogleNews;

use crate::error::{PipelineError, PipelineResult};
use crate::models::NewsArticle;
use crate::services::providers::NewsSearch;

/// 新闻获取
///
/// 返回的条数不做截断，由汇总层决定保留多少条
#[derive(Clone)]
pub struct NewsFetcher {
    source: Arc<dyn NewsSearch>,
}

impl NewsFetcher {
    pub fn new(source: Arc<dyn NewsSearch>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, query: &str) -> PipelineResult<Vec<NewsArticle>> {
        log::info!("获取新闻: '{}'", query);

        match self.source.search(query).await {
            Ok(articles) => {
                log::info!("获取到 {} 条新闻", articles.len());
                Ok(articles)
            }
            Err(e) => {
                log::error!("搜索新闻失败 '{}': {}", query, e);
                Err(PipelineError::Search(query.to_string()))
            }
        }
    }
}
