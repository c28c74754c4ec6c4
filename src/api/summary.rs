use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{BotProfit, Currency, Decimal, Instrument, Investment};
use crate::engine::{compute_positions, InstrumentState};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SpotSummaryQuery {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSymbolSummary {
    pub symbol: String,
    pub position_quantity: Decimal,
    pub average_cost: Decimal,
    pub position_cost_value: Decimal,
    pub realized_pnl: Decimal,
    pub last_trade_at: Option<i64>,
    pub last_buy_price: Decimal,
    pub total_gross_profit: Decimal,
    pub source_price: Decimal,
    pub cost_price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummaryResponse {
    pub symbols: Vec<SpotSymbolSummary>,
    pub total_position_cost_value: Decimal,
    pub total_realized_pnl: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolProfit {
    pub symbol: String,
    pub profit: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotsSummaryResponse {
    pub total_profit: Decimal,
    pub by_symbol: Vec<SymbolProfit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalAssets {
    pub usdt: Decimal,
    pub myr: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummaryResponse {
    pub spot_realized_pnl: Decimal,
    pub bots_profit: Decimal,
    pub invest_usdt: Decimal,
    pub invest_myr: Decimal,
    /// Per-currency totals with no conversion between them.
    pub total_assets: TotalAssets,
}

fn build_spot_summary(states: &BTreeMap<Instrument, InstrumentState>) -> SpotSummaryResponse {
    let mut symbols = Vec::with_capacity(states.len());
    let mut total_position_cost_value = Decimal::zero();
    let mut total_realized_pnl = Decimal::zero();

    for (symbol, state) in states {
        let average_cost = state.average_cost();
        let position_cost_value = average_cost * state.quantity;

        symbols.push(SpotSymbolSummary {
            symbol: symbol.as_str().to_string(),
            position_quantity: state.quantity,
            average_cost,
            position_cost_value,
            realized_pnl: state.realized_pnl,
            last_trade_at: state.last_trade_at.map(|t| t.as_i64()),
            last_buy_price: state.last_buy_price,
            total_gross_profit: state.total_gross_profit,
            source_price: state.source_price(),
            cost_price: state.cost_price(),
        });

        total_position_cost_value += position_cost_value;
        total_realized_pnl += state.realized_pnl;
    }

    SpotSummaryResponse {
        symbols,
        total_position_cost_value,
        total_realized_pnl,
    }
}

fn build_bots_summary(records: &[BotProfit]) -> BotsSummaryResponse {
    let mut total_profit = Decimal::zero();
    let mut by_symbol: BTreeMap<Instrument, Decimal> = BTreeMap::new();

    for record in records {
        total_profit += record.profit;
        *by_symbol.entry(record.symbol.clone()).or_default() += record.profit;
    }

    BotsSummaryResponse {
        total_profit,
        by_symbol: by_symbol
            .into_iter()
            .map(|(symbol, profit)| SymbolProfit {
                symbol: symbol.as_str().to_string(),
                profit,
            })
            .collect(),
    }
}

fn build_overall_summary(
    spot_states: &BTreeMap<Instrument, InstrumentState>,
    bot_profits: &[BotProfit],
    investments: &[Investment],
) -> OverallSummaryResponse {
    // Open position cost is deliberately left out of the asset totals;
    // only crystallized P&L counts.
    let mut spot_realized_pnl = Decimal::zero();
    for state in spot_states.values() {
        spot_realized_pnl += state.realized_pnl;
    }

    let mut bots_profit = Decimal::zero();
    for record in bot_profits {
        bots_profit += record.profit;
    }

    let mut invest_usdt = Decimal::zero();
    let mut invest_myr = Decimal::zero();
    for investment in investments {
        match investment.currency {
            Currency::Usdt => invest_usdt += investment.amount,
            Currency::Myr => invest_myr += investment.amount,
        }
    }

    OverallSummaryResponse {
        spot_realized_pnl,
        bots_profit,
        invest_usdt,
        invest_myr,
        total_assets: TotalAssets {
            usdt: invest_usdt + bots_profit + spot_realized_pnl,
            myr: invest_myr,
        },
    }
}

pub async fn get_spot_summary(
    Query(params): Query<SpotSummaryQuery>,
    State(state): State<AppState>,
) -> Result<Json<SpotSummaryResponse>, AppError> {
    let symbol = match params.symbol.as_deref() {
        Some("") | None => None,
        Some(s) => Some(Instrument::normalized(s)),
    };

    let trades = state.repo.query_trades(symbol.as_ref()).await?;
    let states = compute_positions(&trades)?;
    Ok(Json(build_spot_summary(&states)))
}

pub async fn get_bots_summary(
    State(state): State<AppState>,
) -> Result<Json<BotsSummaryResponse>, AppError> {
    let records = state.repo.list_bot_profits().await?;
    Ok(Json(build_bots_summary(&records)))
}

pub async fn get_overall_summary(
    State(state): State<AppState>,
) -> Result<Json<OverallSummaryResponse>, AppError> {
    let trades = state.repo.query_trades(None).await?;
    let spot_states = compute_positions(&trades)?;
    let bot_profits = state.repo.list_bot_profits().await?;
    let investments = state.repo.list_investments().await?;

    Ok(Json(build_overall_summary(
        &spot_states,
        &bot_profits,
        &investments,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeCurrency, Side, SpotTrade, TimeMs};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn trade(symbol: &str, side: Side, qty: &str, price: &str, at: i64) -> SpotTrade {
        SpotTrade::new(
            Instrument::normalized(symbol),
            side,
            dec(qty),
            dec(price),
            Decimal::zero(),
            FeeCurrency::Quote,
            TimeMs::new(at),
            None,
        )
    }

    fn bot_profit(symbol: &str, profit: &str) -> BotProfit {
        BotProfit {
            id: None,
            bot_name: None,
            symbol: Instrument::normalized(symbol),
            profit: dec(profit),
            closed_at: TimeMs::new(0),
            note: None,
        }
    }

    fn investment(currency: Currency, amount: &str) -> Investment {
        Investment {
            id: None,
            currency,
            amount: dec(amount),
            invested_at: TimeMs::new(0),
            note: None,
        }
    }

    #[test]
    fn test_spot_summary_sorted_with_totals() {
        let trades = vec![
            trade("ETH", Side::Buy, "10", "20", 1),
            trade("BTC", Side::Buy, "1", "100", 2),
            trade("BTC", Side::Sell, "1", "150", 3),
        ];
        let states = compute_positions(&trades).unwrap();
        let summary = build_spot_summary(&states);

        let names: Vec<&str> = summary.symbols.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(names, vec!["BTC", "ETH"]);

        assert_eq!(summary.total_realized_pnl, dec("50"));
        // only the ETH position is still open: 10 * 20
        assert_eq!(summary.total_position_cost_value, dec("200"));

        let eth = &summary.symbols[1];
        assert_eq!(eth.position_quantity, dec("10"));
        assert_eq!(eth.average_cost, dec("20"));
        assert_eq!(eth.last_trade_at, Some(1));
    }

    #[test]
    fn test_spot_summary_exposes_gross_profit_metrics() {
        let trades = vec![
            trade("BTC", Side::Buy, "2", "50", 1),
            trade("BTC", Side::Buy, "1", "80", 2),
            trade("BTC", Side::Sell, "1.5", "90", 3),
        ];
        let states = compute_positions(&trades).unwrap();
        let summary = build_spot_summary(&states);
        let btc = &summary.symbols[0];
        assert_eq!(btc.last_buy_price, dec("80"));
        assert_eq!(btc.total_gross_profit, dec("15"));
        assert_eq!(btc.source_price, dec("120"));
        assert_eq!(btc.cost_price, dec("70"));
    }

    #[test]
    fn test_bots_summary_groups_by_symbol() {
        let records = vec![
            bot_profit("ETH", "5"),
            bot_profit("BTC", "10"),
            bot_profit("ETH", "-2"),
        ];
        let summary = build_bots_summary(&records);
        assert_eq!(summary.total_profit, dec("13"));
        assert_eq!(summary.by_symbol.len(), 2);
        assert_eq!(summary.by_symbol[0].symbol, "BTC");
        assert_eq!(summary.by_symbol[0].profit, dec("10"));
        assert_eq!(summary.by_symbol[1].symbol, "ETH");
        assert_eq!(summary.by_symbol[1].profit, dec("3"));
    }

    #[test]
    fn test_overall_summary_totals_without_conversion() {
        let trades = vec![
            trade("BTC", Side::Buy, "1", "100", 1),
            trade("BTC", Side::Sell, "1", "150", 2),
        ];
        let states = compute_positions(&trades).unwrap();
        let bots = vec![bot_profit("BTCUSDT", "25")];
        let invests = vec![
            investment(Currency::Usdt, "1000"),
            investment(Currency::Usdt, "-100"),
            investment(Currency::Myr, "500"),
        ];

        let summary = build_overall_summary(&states, &bots, &invests);
        assert_eq!(summary.spot_realized_pnl, dec("50"));
        assert_eq!(summary.bots_profit, dec("25"));
        assert_eq!(summary.invest_usdt, dec("900"));
        assert_eq!(summary.invest_myr, dec("500"));
        assert_eq!(summary.total_assets.usdt, dec("975"));
        // MYR is reported as-is, never converted
        assert_eq!(summary.total_assets.myr, dec("500"));
    }

    #[test]
    fn test_empty_everything() {
        let states = BTreeMap::new();
        let summary = build_overall_summary(&states, &[], &[]);
        assert_eq!(summary.spot_realized_pnl, Decimal::zero());
        assert_eq!(summary.total_assets.usdt, Decimal::zero());
        assert_eq!(summary.total_assets.myr, Decimal::zero());
    }
}
