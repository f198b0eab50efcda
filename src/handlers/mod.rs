pub mod company;
pub mod health;
pub mod watchlist;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(company::config)
            .configure(watchlist::config)
    );
}
