//! Device management operations that keep workers in step with stored state.
//!
//! Every operation that changes a device's status goes through
//! [`DeviceService`], which commits the change first and then starts or stops
//! the worker. A failed store write therefore never leaves a worker running
//! for a device the store still considers inactive.
//!
//! Status changes and deletions are serialized: the store update and the
//! matching worker start or stop happen under one lock, so two overlapping
//! toggles cannot commit in one order and reach the worker set in the other.

use crate::manager::WorkerManager;
use elid_core::DeviceCategory;
use elid_core::constants::DEFAULT_TRANSACTION_PAGE_SIZE;
use elid_storage::repositories::{
    DeviceRepository, SqliteDeviceRepository, SqliteTransactionRepository, TransactionRepository,
};
use elid_storage::{Database, Device, StorageError, StorageResult, Transaction, atomic};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Current worker activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStatus {
    pub active_worker_count: usize,
    pub message: String,
}

/// Device and transaction operations over the SQLite store.
#[derive(Debug, Clone)]
pub struct DeviceService {
    db: Database,
    devices: SqliteDeviceRepository,
    transactions: SqliteTransactionRepository,
    workers: WorkerManager<Database>,
    lifecycle: Arc<Mutex<()>>,
}

impl DeviceService {
    pub fn new(db: Database, workers: WorkerManager<Database>) -> Self {
        Self {
            devices: SqliteDeviceRepository::new(db.pool().clone()),
            transactions: SqliteTransactionRepository::new(db.pool().clone()),
            db,
            workers,
            lifecycle: Arc::new(Mutex::new(())),
        }
    }

    pub fn workers(&self) -> &WorkerManager<Database> {
        &self.workers
    }

    pub async fn list_devices(&self) -> StorageResult<Vec<Device>> {
        self.devices.find_all().await
    }

    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] for an unknown id.
    pub async fn get_device(&self, id: Uuid) -> StorageResult<Device> {
        self.devices
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::device_not_found(id))
    }

    /// Register a new device. Devices always start inactive.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] if `category` is not a known
    /// device category or `name` / `ip_address` is blank.
    pub async fn create_device(
        &self,
        name: &str,
        category: &str,
        ip_address: &str,
    ) -> StorageResult<Device> {
        let category: DeviceCategory = category.parse()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::Validation("Device name must not be empty".into()));
        }
        let ip_address = ip_address.trim();
        if ip_address.is_empty() {
            return Err(StorageError::Validation("IP address must not be empty".into()));
        }

        let device = Device::new(name, category, ip_address);
        self.devices.create(&device).await?;

        info!(device_id = %device.id, device = %device.name, category = %category, "Device created");
        Ok(device)
    }

    /// Flip a device between active and inactive and start or stop its worker to match.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] for an unknown id. The worker set is
    /// left untouched when the store update fails.
    pub async fn toggle_device_status(&self, id: Uuid) -> StorageResult<Device> {
        let _lifecycle = self.lifecycle.lock().await;

        let mut tx = self.db.begin_immediate().await?;
        let device = atomic::toggle_device_status(&mut tx, id).await?;
        tx.commit().await?;

        info!(device_id = %device.id, status = %device.status, "Device status changed");

        if device.is_active() {
            self.workers
                .start(device.id, &device.name, &device.device_type)
                .await;
        } else {
            self.workers.stop(device.id).await;
        }

        Ok(device)
    }

    /// Stop the device's worker, then delete the device and its transactions.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] for an unknown id.
    pub async fn delete_device(&self, id: Uuid) -> StorageResult<()> {
        let _lifecycle = self.lifecycle.lock().await;

        if self.workers.is_active(id).await {
            self.workers.stop(id).await;
        }
        self.devices.delete(id).await?;

        info!(device_id = %id, "Device deleted");
        Ok(())
    }

    /// Most recent transactions across all devices, newest first.
    ///
    /// `limit` defaults to 100.
    pub async fn list_transactions(
        &self,
        limit: Option<i64>,
        offset: i64,
    ) -> StorageResult<Vec<Transaction>> {
        let limit = limit.unwrap_or(DEFAULT_TRANSACTION_PAGE_SIZE);
        if limit < 0 || offset < 0 {
            return Err(StorageError::Validation(
                "limit and offset must not be negative".into(),
            ));
        }
        self.transactions.find_recent(limit, offset).await
    }

    /// Most recent transactions of one device, newest first
    pub async fn device_transactions(
        &self,
        id: Uuid,
        limit: Option<i64>,
    ) -> StorageResult<Vec<Transaction>> {
        self.get_device(id).await?;
        self.transactions
            .find_by_device(id, limit.unwrap_or(DEFAULT_TRANSACTION_PAGE_SIZE))
            .await
    }

    pub async fn worker_status(&self) -> WorkerStatus {
        let count = self.workers.active_count().await;
        WorkerStatus {
            active_worker_count: count,
            message: format!("{count} device(s) currently generating transactions"),
        }
    }
}
