//! Repository for all database operations.

use crate::domain::{
    BotProfit, Currency, Decimal, FeeCurrency, Instrument, Investment, SpotTrade, TimeMs,
};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

/// Parse a stored decimal column, falling back to zero on corruption.
fn parse_decimal_column(value: &str, table: &str, column: &str, id: i64) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        warn!(table, column, id, value, error = %e, "Failed to parse stored decimal, using zero");
        Decimal::zero()
    })
}

fn trade_from_row(row: &sqlx::sqlite::SqliteRow) -> SpotTrade {
    let id: i64 = row.get("id");
    let quantity: String = row.get("quantity");
    let price: String = row.get("price");
    let fee: String = row.get("fee");
    let fee_currency: String = row.get("fee_currency");

    SpotTrade {
        id: Some(id),
        symbol: Instrument::new(row.get("symbol")),
        side: row.get("side"),
        quantity: parse_decimal_column(&quantity, "spot_trades", "quantity", id),
        price: parse_decimal_column(&price, "spot_trades", "price", id),
        fee: parse_decimal_column(&fee, "spot_trades", "fee", id),
        fee_currency: FeeCurrency::from_label(&fee_currency),
        traded_at: TimeMs::new(row.get("traded_at")),
        note: row.get("note"),
    }
}

fn bot_profit_from_row(row: &sqlx::sqlite::SqliteRow) -> BotProfit {
    let id: i64 = row.get("id");
    let profit: String = row.get("profit");

    BotProfit {
        id: Some(id),
        bot_name: row.get("bot_name"),
        symbol: Instrument::new(row.get("symbol")),
        profit: parse_decimal_column(&profit, "bot_profits", "profit", id),
        closed_at: TimeMs::new(row.get("closed_at")),
        note: row.get("note"),
    }
}

fn investment_from_row(row: &sqlx::sqlite::SqliteRow) -> Investment {
    let id: i64 = row.get("id");
    let amount: String = row.get("amount");
    let currency_str: String = row.get("currency");
    let currency = currency_str.parse::<Currency>().unwrap_or_else(|e| {
        warn!(id, currency = %currency_str, error = %e, "Unknown stored currency, treating as USDT");
        Currency::Usdt
    });

    Investment {
        id: Some(id),
        currency,
        amount: parse_decimal_column(&amount, "investments", "amount", id),
        invested_at: TimeMs::new(row.get("invested_at")),
        note: row.get("note"),
    }
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    // =========================================================================
    // Spot trade operations
    // =========================================================================

    /// Insert a spot trade and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_trade(&self, trade: &SpotTrade) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO spot_trades (symbol, side, quantity, price, fee, fee_currency, traded_at, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trade.symbol.as_str())
        .bind(trade.side.as_str())
        .bind(trade.quantity.to_canonical_string())
        .bind(trade.price.to_canonical_string())
        .bind(trade.fee.to_canonical_string())
        .bind(trade.fee_currency.as_str())
        .bind(trade.traded_at.as_i64())
        .bind(trade.note.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Query spot trades, optionally restricted to one symbol, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_trades(
        &self,
        symbol: Option<&Instrument>,
    ) -> Result<Vec<SpotTrade>, sqlx::Error> {
        let (sql, binds_symbol) = if symbol.is_some() {
            (
                r#"
                SELECT id, symbol, side, quantity, price, fee, fee_currency, traded_at, note
                FROM spot_trades
                WHERE symbol = ?
                ORDER BY traded_at DESC, id DESC
                "#,
                true,
            )
        } else {
            (
                r#"
                SELECT id, symbol, side, quantity, price, fee, fee_currency, traded_at, note
                FROM spot_trades
                ORDER BY traded_at DESC, id DESC
                "#,
                false,
            )
        };

        let mut query = sqlx::query(sql);
        if binds_symbol {
            query = query.bind(symbol.expect("binds_symbol implies symbol is Some").as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(trade_from_row).collect())
    }

    /// Delete a spot trade by id. Returns false if no such row existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_trade(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM spot_trades WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Symbol and bot registries
    // =========================================================================

    /// Insert a symbol if missing and return its (id, symbol) row.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_symbol(&self, symbol: &Instrument) -> Result<(i64, String), sqlx::Error> {
        sqlx::query("INSERT INTO symbols (symbol) VALUES (?) ON CONFLICT(symbol) DO NOTHING")
            .bind(symbol.as_str())
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT id, symbol FROM symbols WHERE symbol = ?")
            .bind(symbol.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok((row.get("id"), row.get("symbol")))
    }

    /// List registered symbols in alphabetical order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_symbols(&self) -> Result<Vec<(i64, String)>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, symbol FROM symbols ORDER BY symbol ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("symbol")))
            .collect())
    }

    /// Insert a bot name if missing and return its (id, name) row.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_bot(&self, name: &str) -> Result<(i64, String), sqlx::Error> {
        sqlx::query("INSERT INTO bots (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT id, name FROM bots WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok((row.get("id"), row.get("name")))
    }

    /// List registered bot names in alphabetical order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_bots(&self) -> Result<Vec<(i64, String)>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name FROM bots ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("name")))
            .collect())
    }

    // =========================================================================
    // Bot profit records
    // =========================================================================

    /// Insert a bot profit record and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_bot_profit(&self, record: &BotProfit) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO bot_profits (bot_name, symbol, profit, closed_at, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.bot_name.as_deref())
        .bind(record.symbol.as_str())
        .bind(record.profit.to_canonical_string())
        .bind(record.closed_at.as_i64())
        .bind(record.note.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List bot profit records, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_bot_profits(&self) -> Result<Vec<BotProfit>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, bot_name, symbol, profit, closed_at, note
            FROM bot_profits
            ORDER BY closed_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(bot_profit_from_row).collect())
    }

    /// Delete a bot profit record by id. Returns false if no such row existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_bot_profit(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bot_profits WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Investments
    // =========================================================================

    /// Insert an investment entry and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_investment(&self, investment: &Investment) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO investments (currency, amount, invested_at, note)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(investment.currency.as_str())
        .bind(investment.amount.to_canonical_string())
        .bind(investment.invested_at.as_i64())
        .bind(investment.note.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List investment entries, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_investments(&self) -> Result<Vec<Investment>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, currency, amount, invested_at, note
            FROM investments
            ORDER BY invested_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(investment_from_row).collect())
    }
}
