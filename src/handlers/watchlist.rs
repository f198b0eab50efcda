use std::collections::HashMap;

use actix_web::{web, HttpResponse, Result};

use super::company::NAME_REQUIRED;
use crate::models::{ApiResponse, CompanyData, DashboardEntry, WatchlistRequest};
use crate::state::AppState;

fn has_blank_name(request: &WatchlistRequest) -> bool {
    request.companies.iter().any(|name| name.trim().is_empty())
}

/// 刷新全部自选股数据（并发获取，结果按公司名称索引）
pub async fn get_watchlist_data(
    state: web::Data<AppState>,
    body: web::Json<WatchlistRequest>,
) -> Result<HttpResponse> {
    if has_blank_name(&body) {
        let response = ApiResponse::<HashMap<String, CompanyData>>::error(NAME_REQUIRED);
        return Ok(HttpResponse::BadRequest().json(response));
    }

    let results = state.watchlist.fan_out(&body.companies).await;
    let failed = results.values().filter(|data| data.is_failed()).count();
    log::info!("自选股刷新完成: {} 家公司，{} 家失败", results.len(), failed);

    Ok(HttpResponse::Ok().json(ApiResponse::success(results)))
}

/// 首屏加载：按自选股顺序同步获取前几家公司
pub async fn get_dashboard(
    state: web::Data<AppState>,
    body: web::Json<WatchlistRequest>,
) -> Result<HttpResponse> {
    if has_blank_name(&body) {
        let response = ApiResponse::<Vec<DashboardEntry>>::error(NAME_REQUIRED);
        return Ok(HttpResponse::BadRequest().json(response));
    }

    let entries = state
        .watchlist
        .load_initial(&body.companies, state.initial_load_limit)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/watchlist")
            .route("/data", web::post().to(get_watchlist_data))
            .route("/dashboard", web::post().to(get_dashboard)),
    );
}

// ==================== 测试模块 ====================
