use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::Instrument;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateSymbolRequest {
    pub symbol: String,
}

#[derive(Debug, Serialize)]
pub struct SymbolDto {
    pub id: i64,
    pub symbol: String,
}

pub async fn list_symbols(State(state): State<AppState>) -> Result<Json<Vec<SymbolDto>>, AppError> {
    let rows = state.repo.list_symbols().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(id, symbol)| SymbolDto { id, symbol })
            .collect(),
    ))
}

pub async fn create_symbol(
    State(state): State<AppState>,
    Json(payload): Json<CreateSymbolRequest>,
) -> Result<Json<SymbolDto>, AppError> {
    let symbol = Instrument::normalized(&payload.symbol);
    if symbol.as_str().is_empty() {
        return Err(AppError::BadRequest("symbol must not be empty".into()));
    }
    let (id, symbol) = state.repo.upsert_symbol(&symbol).await?;
    Ok(Json(SymbolDto { id, symbol }))
}
