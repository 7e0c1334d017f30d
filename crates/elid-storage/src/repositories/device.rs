use crate::error::{StorageError, StorageResult};
use crate::models::Device;
use chrono::Utc;
use elid_core::DeviceStatus;
use sqlx::SqlitePool;
use std::future::Future;
use uuid::Uuid;

/// Repository trait for Device entity operations
///
/// # Implementation Note
///
/// Methods are declared as `fn -> impl Future + Send` instead of `async fn` so
/// that callers generic over the repository can move its futures into spawned
/// Tokio tasks. Implementations may still write the bodies as `async fn`.
pub trait DeviceRepository: Send + Sync {
    /// All devices, oldest first
    fn find_all(&self) -> impl Future<Output = StorageResult<Vec<Device>>> + Send;

    /// Find a device by its id
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = StorageResult<Option<Device>>> + Send;

    /// Devices whose status is `active`
    fn find_active(&self) -> impl Future<Output = StorageResult<Vec<Device>>> + Send;

    /// Check whether a device id is registered
    fn exists(&self, id: Uuid) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Insert a new device
    fn create(&self, device: &Device) -> impl Future<Output = StorageResult<()>> + Send;

    /// Set a device's status and bump `updated_at`
    fn update_status(
        &self,
        id: Uuid,
        status: DeviceStatus,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    /// Delete a device (its transactions cascade)
    fn delete(&self, id: Uuid) -> impl Future<Output = StorageResult<()>> + Send;
}

/// SQLite implementation of DeviceRepository
#[derive(Debug, Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new SQLite device repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn find_all(&self) -> StorageResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, name, device_type, ip_address, status, created_at, updated_at
            FROM devices
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, name, device_type, ip_address, status, created_at, updated_at
            FROM devices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    async fn find_active(&self) -> StorageResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, name, device_type, ip_address, status, created_at, updated_at
            FROM devices
            WHERE status = ?
            ORDER BY created_at
            "#,
        )
        .bind(DeviceStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn create(&self, device: &Device) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO devices (
                id, name, device_type, ip_address, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(device.id)
        .bind(&device.name)
        .bind(&device.device_type)
        .bind(&device.ip_address)
        .bind(&device.status)
        .bind(device.created_at)
        .bind(device.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_write)?;

        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: DeviceStatus) -> StorageResult<()> {
        let result = sqlx::query("UPDATE devices SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::device_not_found(id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::device_not_found(id));
        }

        Ok(())
    }
}
