use crate::error::{StorageError, StorageResult};
use crate::models::Transaction;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use std::future::Future;
use uuid::Uuid;

/// Repository trait for Transaction entity operations
///
/// Transactions are append-only; there is no update or single-row delete.
/// Rows disappear only when their device is deleted.
pub trait TransactionRepository: Send + Sync {
    /// Insert a transaction.
    ///
    /// Fails with [`StorageError::NotFound`] when the owning device does not exist.
    fn create(&self, transaction: &Transaction) -> impl Future<Output = StorageResult<()>> + Send;

    /// Most recent transactions across all devices, newest first
    fn find_recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> impl Future<Output = StorageResult<Vec<Transaction>>> + Send;

    /// Most recent transactions of a single device, newest first
    fn find_by_device(
        &self,
        device_id: Uuid,
        limit: i64,
    ) -> impl Future<Output = StorageResult<Vec<Transaction>>> + Send;

    /// Number of transactions recorded for a device
    fn count_by_device(&self, device_id: Uuid) -> impl Future<Output = StorageResult<i64>> + Send;
}

/// SQLite implementation of TransactionRepository
#[derive(Debug, Clone)]
pub struct SqliteTransactionRepository {
    pool: SqlitePool,
}

impl SqliteTransactionRepository {
    /// Create a new SQLite transaction repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TransactionRepository for SqliteTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, device_id, timestamp, username,
                event_type, payload, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.transaction_id)
        .bind(transaction.device_id)
        .bind(transaction.timestamp)
        .bind(&transaction.username)
        .bind(&transaction.event_type)
        .bind(&transaction.payload)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), ErrorKind::ForeignKeyViolation) =>
            {
                StorageError::device_not_found(transaction.device_id)
            }
            _ => StorageError::from_write(e),
        })?;

        Ok(())
    }

    async fn find_recent(&self, limit: i64, offset: i64) -> StorageResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, device_id, timestamp, username,
                   event_type, payload, created_at
            FROM transactions
            ORDER BY timestamp DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn find_by_device(&self, device_id: Uuid, limit: i64) -> StorageResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, device_id, timestamp, username,
                   event_type, payload, created_at
            FROM transactions
            WHERE device_id = ?
            ORDER BY timestamp DESC
            LIMIT ?
            "#,
        )
        .bind(device_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn count_by_device(&self, device_id: Uuid) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE device_id = ?")
            .bind(device_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
