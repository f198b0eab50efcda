//! 自选股请求/响应模型

use serde::{Deserialize, Serialize};

use super::CompanyData;

/// 自选股批量请求
///
/// 公司名称由调用方（持久化层）提供，按创建时间倒序排列
#[derive(Debug, Deserialize)]
pub struct WatchlistRequest {
    pub companies: Vec<String>,
}

/// 代码解析查询参数
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// 公司名称或部分代码
    pub q: String,
}

/// 代码解析结果
#[derive(Debug, Serialize)]
pub struct TickerResolution {
    pub query: String,
    pub ticker: String,
}

/// 首屏加载条目，保持自选股顺序
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DashboardEntry {
    pub company_name: String,
    pub data: CompanyData,
}
