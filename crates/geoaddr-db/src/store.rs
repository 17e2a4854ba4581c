//! [`AccessLogStore`] backed by the `access_logs` table.

use geoaddr_core::{AccessLogEntry, AccessLogStore, PersistenceError};
use sqlx::PgPool;

use crate::access_logs::{insert_access_log, list_access_counts, AccessCountRow};

#[derive(Debug, Clone)]
pub struct PgAccessLogStore {
    pool: PgPool,
}

impl PgAccessLogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<AccessCountRow> for AccessLogEntry {
    fn from(row: AccessCountRow) -> Self {
        Self {
            postal_code: row.postal_code,
            request_count: row.request_count,
        }
    }
}

impl AccessLogStore for PgAccessLogStore {
    async fn record(&self, postal_code: &str) -> Result<(), PersistenceError> {
        let row = insert_access_log(&self.pool, postal_code).await?;
        tracing::debug!(id = row.id, postal_code, "access log recorded");
        Ok(())
    }

    async fn aggregate_counts(&self) -> Result<Vec<AccessLogEntry>, PersistenceError> {
        let rows = list_access_counts(&self.pool).await?;
        Ok(rows.into_iter().map(AccessLogEntry::from).collect())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
