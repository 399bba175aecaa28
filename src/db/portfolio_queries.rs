use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::models::Portfolio;

pub async fn find_or_create(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
) -> Result<Portfolio, sqlx::Error> {
    let existing = sqlx::query_as::<_, Portfolio>(
        "SELECT id, user_id, name, created_at, updated_at
         FROM portfolios
         WHERE user_id = $1 AND name = $2",
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(portfolio) = existing {
        return Ok(portfolio);
    }

    sqlx::query_as::<_, Portfolio>(
        "INSERT INTO portfolios (id, user_id, name)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, name, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .fetch_one(&mut **tx)
    .await
}

pub async fn touch(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE portfolios SET updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
