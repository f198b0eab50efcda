//! 新闻数据模型

use serde::{Deserialize, Serialize};

/// 新闻条目
///
/// 字段含义沿用新闻源返回的内容，不做二次加工
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NewsArticle {
    /// 标题
    pub title: String,
    /// 来源媒体
    pub media: String,
    /// 发布时间（新闻源原始格式）
    pub date: String,
    /// 发布时间（RFC 3339，无法解析时为空）
    pub datetime: Option<String>,
    /// 摘要
    pub desc: String,
    /// 原文链接
    pub link: String,
}
