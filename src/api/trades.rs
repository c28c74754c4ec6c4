use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::domain::{Decimal, FeeCurrency, Instrument, Side, SpotTrade, TimeMs};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeRequest {
    pub symbol: String,
    pub side: String,
    pub quantity: Option<Decimal>,
    /// Quote notional; alternative to `quantity`.
    pub amount_quote: Option<Decimal>,
    pub price: Decimal,
    pub fee: Option<Decimal>,
    pub traded_at: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesResponse {
    pub trades: Vec<TradeDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    pub id: i64,
    pub symbol: String,
    pub side: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub fee_currency: String,
    pub traded_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TradeDto {
    fn from_trade(trade: &SpotTrade) -> Self {
        TradeDto {
            id: trade.id.unwrap_or_default(),
            symbol: trade.symbol.as_str().to_string(),
            side: trade.side.clone(),
            quantity: trade.quantity,
            price: trade.price,
            fee: trade.fee,
            fee_currency: trade.fee_currency.as_str().to_string(),
            traded_at: trade.traded_at.as_i64(),
            note: trade.note.clone(),
        }
    }
}

/// A trade payload resolved to the normalized form the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NormalizedTrade {
    quantity: Decimal,
    fee: Decimal,
    fee_currency: FeeCurrency,
}

/// Resolve quantity, fee, and fee currency for a submitted trade.
///
/// Quantity comes either directly or from a quote notional divided by
/// price. A missing fee defaults from the configured rate: buys in
/// quantity mode pay it in base units, everything else on the quote side.
/// The fee currency is always derived here, never client-supplied.
fn normalize_new_trade(
    side: Side,
    quantity: Option<Decimal>,
    amount_quote: Option<Decimal>,
    price: Decimal,
    fee: Option<Decimal>,
    fee_rate: Decimal,
) -> Result<NormalizedTrade, AppError> {
    let used_amount_mode = amount_quote.is_some() && quantity.map_or(true, |q| q.is_zero());

    let quantity = if used_amount_mode {
        if !price.is_positive() {
            return Err(AppError::BadRequest(
                "price must be > 0 when using amountQuote".into(),
            ));
        }
        amount_quote.unwrap_or_else(Decimal::zero) / price
    } else {
        quantity.unwrap_or_else(Decimal::zero)
    };

    if !quantity.is_positive() {
        return Err(AppError::BadRequest("quantity must be positive".into()));
    }

    let fee = match fee {
        Some(fee) => fee,
        None => match side {
            Side::Buy if used_amount_mode => quantity * price * fee_rate,
            Side::Buy => quantity * fee_rate,
            Side::Sell => quantity * price * fee_rate,
        },
    };

    let fee_currency = if side == Side::Sell || used_amount_mode {
        FeeCurrency::Quote
    } else {
        FeeCurrency::Base
    };

    Ok(NormalizedTrade {
        quantity,
        fee,
        fee_currency,
    })
}

pub async fn create_trade(
    State(state): State<AppState>,
    Json(payload): Json<CreateTradeRequest>,
) -> Result<Json<TradeDto>, AppError> {
    let side: Side = payload
        .side
        .parse()
        .map_err(|_| AppError::BadRequest("side must be BUY or SELL".into()))?;

    let symbol = Instrument::normalized(&payload.symbol);
    if symbol.as_str().is_empty() {
        return Err(AppError::BadRequest("symbol must not be empty".into()));
    }

    let normalized = normalize_new_trade(
        side,
        payload.quantity,
        payload.amount_quote,
        payload.price,
        payload.fee,
        state.config.default_fee_rate,
    )?;

    let trade = SpotTrade::new(
        symbol,
        side,
        normalized.quantity,
        payload.price,
        normalized.fee,
        normalized.fee_currency,
        payload.traded_at.map(TimeMs::new).unwrap_or_else(TimeMs::now),
        payload.note,
    );

    let id = state.repo.insert_trade(&trade).await?;
    Ok(Json(TradeDto::from_trade(&trade.with_id(id))))
}

pub async fn list_trades(
    Query(params): Query<TradesQuery>,
    State(state): State<AppState>,
) -> Result<Json<TradesResponse>, AppError> {
    let symbol = match params.symbol.as_deref() {
        Some("") | None => None,
        Some(s) => Some(Instrument::normalized(s)),
    };

    let trades = state.repo.query_trades(symbol.as_ref()).await?;
    Ok(Json(TradesResponse {
        trades: trades.iter().map(TradeDto::from_trade).collect(),
    }))
}

pub async fn delete_trade(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.repo.delete_trade(id).await? {
        return Err(AppError::NotFound(format!("trade {} not found", id)));
    }
    Ok(Json(json!({"ok": true})))
}
