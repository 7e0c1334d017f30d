//! The storage seam workers write through.
//!
//! Workers never touch SQL directly. They see the record store as three
//! operations: list the devices that should be running, check that a device
//! still exists, and append a transaction. [`Database`] implements it for
//! production; [`crate::mock::MemoryStore`] implements it for tests.

use elid_storage::repositories::{
    DeviceRepository, SqliteDeviceRepository, SqliteTransactionRepository, TransactionRepository,
};
use elid_storage::{Database, StorageResult, Transaction};
use std::future::Future;
use uuid::Uuid;

/// Identity of a device whose stored status is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDevice {
    pub id: Uuid,
    pub name: String,
    /// Stored category name, passed to workers unparsed
    pub category: String,
}

/// Record store operations needed by workers and the startup reconciler.
///
/// All operations may be called concurrently from many worker tasks.
pub trait RecordStore: Send + Sync + 'static {
    /// Every device whose stored status is active
    fn find_active_devices(&self) -> impl Future<Output = StorageResult<Vec<ActiveDevice>>> + Send;

    /// Whether a device with this id exists
    fn device_exists(&self, id: Uuid) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Append a transaction.
    ///
    /// Must fail with [`elid_storage::StorageError::NotFound`] and write
    /// nothing when the owning device does not exist.
    fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = StorageResult<Transaction>> + Send;
}

impl RecordStore for Database {
    async fn find_active_devices(&self) -> StorageResult<Vec<ActiveDevice>> {
        let devices = SqliteDeviceRepository::new(self.pool().clone())
            .find_active()
            .await?;

        Ok(devices
            .into_iter()
            .map(|d| ActiveDevice {
                id: d.id,
                name: d.name,
                category: d.device_type,
            })
            .collect())
    }

    async fn device_exists(&self, id: Uuid) -> StorageResult<bool> {
        SqliteDeviceRepository::new(self.pool().clone())
            .exists(id)
            .await
    }

    // One autocommit INSERT. The foreign key rejects a missing device, and a
    // single write waits out the busy timeout instead of failing on lock
    // upgrade the way a read-then-write transaction does.
    async fn insert_transaction(&self, transaction: Transaction) -> StorageResult<Transaction> {
        SqliteTransactionRepository::new(self.pool().clone())
            .create(&transaction)
            .await?;

        Ok(transaction)
    }
}
