pub mod bots;
pub mod health;
pub mod investments;
pub mod summary;
pub mod symbols;
pub mod trades;

use crate::config::Config;
use crate::db::Repository;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/symbols",
            get(symbols::list_symbols).post(symbols::create_symbol),
        )
        .route("/v1/bots", get(bots::list_bots).post(bots::create_bot))
        .route(
            "/v1/trades",
            get(trades::list_trades).post(trades::create_trade),
        )
        .route("/v1/trades/:id", delete(trades::delete_trade))
        .route(
            "/v1/bot_profits",
            get(bots::list_bot_profits).post(bots::create_bot_profit),
        )
        .route("/v1/bot_profits/:id", delete(bots::delete_bot_profit))
        .route(
            "/v1/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route("/v1/summary/spot", get(summary::get_spot_summary))
        .route("/v1/summary/bots", get(summary::get_bots_summary))
        .route("/v1/summary/overall", get(summary::get_overall_summary))
        .layer(cors)
        .with_state(state)
}
