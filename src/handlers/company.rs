use actix_web::{web, HttpResponse, Result};

use crate::models::{ApiResponse, CompanyData, ResolveQuery, TickerResolution};
use crate::state::AppState;

pub const NAME_REQUIRED: &str = "Company name is required";

/// 校验公司名称是否能解析为代码（添加自选股前调用）
pub async fn resolve_ticker(
    state: web::Data<AppState>,
    query: web::Query<ResolveQuery>,
) -> Result<HttpResponse> {
    let name = query.q.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<TickerResolution>::error(NAME_REQUIRED)));
    }

    match state.aggregator.resolver().resolve(name).await {
        Ok(ticker) => {
            let response = ApiResponse::success(TickerResolution {
                query: name.to_string(),
                ticker,
            });
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) if e.is_unresolved() => {
            let response = ApiResponse::<TickerResolution>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
        Err(e) => {
            log::error!("解析代码失败 '{}': {}", name, e);
            let response = ApiResponse::<TickerResolution>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 单家公司汇总数据，失败原因在 data.error 中
pub async fn get_company(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let name = path.into_inner();
    let name = name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<CompanyData>::error(NAME_REQUIRED)));
    }

    let data = state.aggregator.aggregate(name).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/tickers/resolve", web::get().to(resolve_ticker))
        .route("/companies/{name}", web::get().to(get_company));
}

// ==================== 测试模块 ====================
