//! Database operations for the `access_logs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `access_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccessLogRow {
    pub id: i64,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

/// Request count for one postal code.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessCountRow {
    pub postal_code: String,
    pub request_count: i64,
}

/// Appends one access row for `postal_code`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_access_log(pool: &PgPool, postal_code: &str) -> Result<AccessLogRow, DbError> {
    let row = sqlx::query_as::<_, AccessLogRow>(
        "INSERT INTO access_logs (postal_code) VALUES ($1) \
         RETURNING id, postal_code, created_at",
    )
    .bind(postal_code)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Counts accesses per postal code, highest count first.
///
/// Ties are ordered by `postal_code` so the output is stable, but callers
/// should not rely on tie order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_access_counts(pool: &PgPool) -> Result<Vec<AccessCountRow>, DbError> {
    let rows = sqlx::query_as::<_, AccessCountRow>(
        "SELECT postal_code, COUNT(id) AS request_count \
         FROM access_logs \
         GROUP BY postal_code \
         ORDER BY COUNT(id) DESC, postal_code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
