//! 自选股数据后端服务
//!
//! 将公司名称解析为 NSE/BSE 代码，汇总行情、技术指标、基本面和最新新闻
//! 数据来源：Yahoo Finance、Google News

mod config;     // 配置
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 共享状态

use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::Env;
use std::env;
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::market::YahooFinance;
use crate::services::news::GoogleNews;
use crate::state::AppState;

/// 应用程序入口
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (mut config, load_message) = AppConfig::load();

    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    log::info!("{}", load_message);

    // 环境变量优先于配置文件
    if let Ok(api_key) = env::var("API_KEY") {
        config.api.api_key = api_key;
    }
    if config.api.api_key.is_empty() {
        log::warn!("未设置 API Key，接口不做认证");
    }

    let yahoo = YahooFinance::new(config.market.clone(), &config.api)
        .map(Arc::new)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("初始化行情客户端失败: {}", e)))?;
    let news = GoogleNews::new(config.news.clone(), &config.api)
        .map(Arc::new)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("初始化新闻客户端失败: {}", e)))?;

    let state = web::Data::new(AppState::new(yahoo.clone(), yahoo, news, &config));

    let bind_addr = config.bind_addr();
    let api_key = config.api.api_key.clone();
    log::info!("启动自选股数据服务，监听 {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .wrap(Logger::default())  // 请求日志
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
