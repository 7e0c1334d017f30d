//! Shared helpers for elid-workers integration tests

#![allow(dead_code)]

use elid_core::{DeviceCategory, DeviceStatus};
use elid_storage::repositories::{DeviceRepository, SqliteDeviceRepository};
use elid_storage::{Database, DatabaseConfig, Device};
use elid_workers::{WorkerConfig, WorkerManager};
use std::sync::Arc;
use std::time::Duration;

/// Worker timing short enough for real-time tests
pub fn fast_config() -> WorkerConfig {
    WorkerConfig::new()
        .interval(Duration::from_millis(10), Duration::from_millis(30))
        .stop_timeout(Duration::from_secs(2))
}

pub async fn setup() -> (Arc<Database>, WorkerManager<Database>) {
    let db = Arc::new(Database::in_memory().await.unwrap());
    let manager = WorkerManager::new(Arc::clone(&db), fast_config());
    (db, manager)
}

/// File-backed pool with several connections, so writers contend for the lock
pub async fn file_database(dir: &tempfile::TempDir) -> Database {
    let path = dir.path().join("elid.db");
    Database::new(DatabaseConfig::new(path.to_string_lossy()).max_connections(10))
        .await
        .unwrap()
}

/// Insert a device with the given status
pub async fn seed_device(db: &Database, name: &str, category: DeviceCategory, active: bool) -> Device {
    let repo = SqliteDeviceRepository::new(db.pool().clone());
    let mut device = Device::new(name, category, "10.1.0.1");
    repo.create(&device).await.unwrap();

    if active {
        repo.update_status(device.id, DeviceStatus::Active).await.unwrap();
        device.status = DeviceStatus::Active.as_str().to_string();
    }

    device
}

pub async fn transaction_count(db: &Database) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(db.pool())
        .await
        .unwrap();
    row.0
}
