use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{Holding, HoldingEntry};

pub async fn delete_for_portfolio(
    tx: &mut Transaction<'_, Postgres>,
    portfolio_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM holdings WHERE portfolio_id = $1")
        .bind(portfolio_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    portfolio_id: Uuid,
    entry: &HoldingEntry,
    purchase_date: DateTime<Utc>,
) -> Result<Holding, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "INSERT INTO holdings (id, portfolio_id, symbol, amount, purchase_price, purchase_date)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, portfolio_id, symbol, amount, purchase_price, purchase_date,
                   created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(portfolio_id)
    .bind(entry.symbol.to_uppercase())
    .bind(entry.amount)
    .bind(entry.purchase_price)
    .bind(purchase_date)
    .fetch_one(&mut **tx)
    .await
}

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Holding>, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "SELECT h.id, h.portfolio_id, h.symbol, h.amount, h.purchase_price, h.purchase_date,
                h.created_at, h.updated_at
         FROM holdings h
         JOIN portfolios p ON p.id = h.portfolio_id
         WHERE p.user_id = $1
         ORDER BY h.symbol ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
