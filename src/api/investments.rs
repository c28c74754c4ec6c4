use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Currency, Decimal, Investment, TimeMs};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub currency: String,
    /// Signed amount; negative entries record withdrawals.
    pub amount: Decimal,
    pub invested_at: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDto {
    pub id: i64,
    pub currency: String,
    pub amount: Decimal,
    pub invested_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl InvestmentDto {
    fn from_investment(investment: &Investment) -> Self {
        InvestmentDto {
            id: investment.id.unwrap_or_default(),
            currency: investment.currency.as_str().to_string(),
            amount: investment.amount,
            invested_at: investment.invested_at.as_i64(),
            note: investment.note.clone(),
        }
    }
}

pub async fn list_investments(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvestmentDto>>, AppError> {
    let rows = state.repo.list_investments().await?;
    Ok(Json(rows.iter().map(InvestmentDto::from_investment).collect()))
}

pub async fn create_investment(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvestmentRequest>,
) -> Result<Json<InvestmentDto>, AppError> {
    let currency: Currency = payload
        .currency
        .parse()
        .map_err(|_| AppError::BadRequest("currency must be USDT or MYR".into()))?;

    let investment = Investment {
        id: None,
        currency,
        amount: payload.amount,
        invested_at: payload
            .invested_at
            .map(TimeMs::new)
            .unwrap_or_else(TimeMs::now),
        note: payload.note,
    };

    let id = state.repo.insert_investment(&investment).await?;
    let investment = Investment {
        id: Some(id),
        ..investment
    };
    Ok(Json(InvestmentDto::from_investment(&investment)))
}
