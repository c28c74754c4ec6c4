use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::domain::{BotProfit, Decimal, Instrument, TimeMs};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BotDto {
    pub id: i64,
    pub name: String,
}

pub async fn list_bots(State(state): State<AppState>) -> Result<Json<Vec<BotDto>>, AppError> {
    let rows = state.repo.list_bots().await?;
    Ok(Json(
        rows.into_iter().map(|(id, name)| BotDto { id, name }).collect(),
    ))
}

pub async fn create_bot(
    State(state): State<AppState>,
    Json(payload): Json<CreateBotRequest>,
) -> Result<Json<BotDto>, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let (id, name) = state.repo.upsert_bot(&name).await?;
    Ok(Json(BotDto { id, name }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBotProfitRequest {
    pub bot_name: Option<String>,
    pub symbol: String,
    pub profit: Decimal,
    pub closed_at: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotProfitDto {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    pub symbol: String,
    pub profit: Decimal,
    pub closed_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BotProfitDto {
    fn from_record(record: &BotProfit) -> Self {
        BotProfitDto {
            id: record.id.unwrap_or_default(),
            bot_name: record.bot_name.clone(),
            symbol: record.symbol.as_str().to_string(),
            profit: record.profit,
            closed_at: record.closed_at.as_i64(),
            note: record.note.clone(),
        }
    }
}

pub async fn list_bot_profits(
    State(state): State<AppState>,
) -> Result<Json<Vec<BotProfitDto>>, AppError> {
    let records = state.repo.list_bot_profits().await?;
    Ok(Json(records.iter().map(BotProfitDto::from_record).collect()))
}

pub async fn create_bot_profit(
    State(state): State<AppState>,
    Json(payload): Json<CreateBotProfitRequest>,
) -> Result<Json<BotProfitDto>, AppError> {
    let record = BotProfit {
        id: None,
        bot_name: payload.bot_name,
        symbol: Instrument::normalized(&payload.symbol),
        profit: payload.profit,
        closed_at: payload.closed_at.map(TimeMs::new).unwrap_or_else(TimeMs::now),
        note: payload.note,
    };

    let id = state.repo.insert_bot_profit(&record).await?;
    let record = BotProfit {
        id: Some(id),
        ..record
    };
    Ok(Json(BotProfitDto::from_record(&record)))
}

pub async fn delete_bot_profit(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.repo.delete_bot_profit(id).await? {
        return Err(AppError::NotFound(format!(
            "bot profit record {} not found",
            id
        )));
    }
    Ok(Json(json!({"ok": true})))
}
