//! 自选股批量获取
//!
//! 刷新时并发汇总全部公司（信号量限制同时进行的数量），首屏加载按顺序逐个汇总

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::models::{CompanyData, DashboardEntry};
use crate::services::company_service::CompanyDataAggregator;

/// 自选股并发汇总
#[derive(Clone)]
pub struct WatchlistFanOut {
    aggregator: Arc<CompanyDataAggregator>,
    concurrency: usize,
}

impl WatchlistFanOut {
    pub fn new(aggregator: Arc<CompanyDataAggregator>, concurrency: usize) -> Self {
        Self {
            aggregator,
            concurrency: concurrency.max(1),
        }
    }

    /// 并发汇总全部公司
    ///
    /// 返回的 key 与输入名称（去重后）完全一致；
    /// 单个任务异常退出时，该公司记录为错误，不影响其他公司
    pub async fn fan_out(&self, names: &[String]) -> HashMap<String, CompanyData> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        let mut tasks = Vec::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }

            let aggregator = self.aggregator.clone();
            let semaphore = semaphore.clone();
            let company = name.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| e.to_string())?;
                Ok::<_, String>(aggregator.aggregate(&company).await)
            }));
            keys.push(name.clone());
        }

        log::info!("并发汇总 {} 家公司，并发上限 {}", keys.len(), self.concurrency);

        let outcomes = join_all(tasks).await;
        keys.into_iter()
            .zip(outcomes)
            .map(|(name, outcome)| {
                let data = match outcome {
                    Ok(Ok(data)) => data,
                    Ok(Err(e)) => CompanyData::failed(e),
                    Err(e) => {
                        log::error!("汇总任务异常退出 '{}': {}", name, e);
                        CompanyData::failed(format!("Task failed for {}: {}", name, e))
                    }
                };
                (name, data)
            })
            .collect()
    }

    /// 首屏加载：按顺序逐个汇总前 limit 家公司
    pub async fn load_initial(&self, names: &[String], limit: usize) -> Vec<DashboardEntry> {
        let mut entries = Vec::with_capacity(limit.min(names.len()));
        for name in names.iter().take(limit) {
            let data = self.aggregator.aggregate(name).await;
            entries.push(DashboardEntry {
                company_name: name.clone(),
                data,
            });
        }
        entries
    }
}

// ==================== 测试模块 ====================
