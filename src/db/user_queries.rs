use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::models::User;

pub async fn find_or_create(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    username: &str,
) -> Result<User, sqlx::Error> {
    let existing = sqlx::query_as::<_, User>(
        "SELECT id, email, username, created_at
         FROM users
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(user) = existing {
        return Ok(user);
    }

    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, username)
         VALUES ($1, $2, $3)
         RETURNING id, email, username, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(username)
    .fetch_one(&mut **tx)
    .await
}
