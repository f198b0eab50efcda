//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 行情数据源配置（Yahoo Finance）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// 代码搜索接口
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// 日K线接口（后接 /{ticker}）
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// 公司基本面接口（后接 /{ticker}）
    #[serde(default = "default_quote_summary_url")]
    pub quote_summary_url: String,
    /// 获取会话 Cookie 的地址
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
    /// 获取 crumb 的地址
    #[serde(default = "default_crumb_url")]
    pub crumb_url: String,
    /// 搜索时偏向的国家市场
    #[serde(default = "default_country")]
    pub country: String,
    /// 搜索返回的候选数量
    #[serde(default = "default_quotes_count")]
    pub quotes_count: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 新闻数据源配置（Google News RSS）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// RSS 搜索接口
    #[serde(default = "default_rss_url")]
    pub rss_url: String,
    /// 语言
    #[serde(default = "default_language")]
    pub language: String,
    /// 地区
    #[serde(default = "default_region")]
    pub region: String,
}

/// 自选股批量获取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// 并发获取的公司数上限
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// 首屏同步加载的公司数
    #[serde(default = "default_initial_load_limit")]
    pub initial_load_limit: usize,
    /// 每家公司保留的新闻条数
    #[serde(default = "default_news_limit")]
    pub news_limit: usize,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_search_url() -> String { "https://query2.finance.yahoo.com/v1/finance/search".to_string() }
fn default_chart_url() -> String { "https://query1.finance.yahoo.com/v8/finance/chart".to_string() }
fn default_quote_summary_url() -> String { "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string() }
fn default_cookie_url() -> String { "https://fc.yahoo.com".to_string() }
fn default_crumb_url() -> String { "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string() }
fn default_country() -> String { "India".to_string() }
fn default_quotes_count() -> usize { 5 }
fn default_user_agent() -> String { "Mozilla/5.0".to_string() }
fn default_rss_url() -> String { "https://news.google.com/rss/search".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_region() -> String { "IN".to_string() }
fn default_concurrency() -> usize { 5 }
fn default_initial_load_limit() -> usize { 5 }
fn default_news_limit() -> usize { 5 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            chart_url: default_chart_url(),
            quote_summary_url: default_quote_summary_url(),
            cookie_url: default_cookie_url(),
            crumb_url: default_crumb_url(),
            country: default_country(),
            quotes_count: default_quotes_count(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            rss_url: default_rss_url(),
            language: default_language(),
            region: default_region(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            initial_load_limit: default_initial_load_limit(),
            news_limit: default_news_limit(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 在日志初始化之前调用，因此加载结果通过返回的说明文字交给调用方输出
    pub fn load() -> (Self, String) {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return (config, format!("从 {} 加载配置成功", path)),
                    Err(e) => return (Self::default(), format!("加载配置文件 {} 失败: {}，使用默认配置", path, e)),
                }
            }
        }

        (Self::default(), "使用默认配置".to_string())
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
