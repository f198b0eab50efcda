//! 数据管道错误类型

use thiserror::Error;

/// 公司数据管道中的错误
///
/// 代码解析与新闻获取会向上返回这些错误，由汇总层统一转换为结果中的 error 字段
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 代码搜索没有返回任何候选
    #[error("No ticker found for: {0}")]
    NotFound(String),

    /// 模糊匹配没有可用的候选名称
    #[error("No matching ticker found for: {0}")]
    NoMatch(String),

    /// 行情或基本面获取失败
    #[error("Failed to fetch data for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    /// 新闻搜索失败（原始原因只写日志）
    #[error("Unable to search articles for query: '{0}'. Try again later...")]
    Search(String),

    /// 数据源请求或解析失败
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl PipelineError {
    /// 是否属于代码无法解析（调用方按 400 处理）
    pub fn is_unresolved(&self) -> bool {
        matches!(self, PipelineError::NotFound(_) | PipelineError::NoMatch(_))
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PipelineError::NotFound("Acme".to_string()).to_string(),
            "No ticker found for: Acme"
        );
        assert_eq!(
            PipelineError::Search("Acme".to_string()).to_string(),
            "Unable to search articles for query: 'Acme'. Try again later..."
        );
        let fetch = PipelineError::Fetch {
            ticker: "ACME.NS".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(fetch.to_string(), "Failed to fetch data for ACME.NS: timeout");
        assert!(PipelineError::NoMatch("Acme".to_string()).is_unresolved());
        assert!(!fetch.is_unresolved());
    }
}
