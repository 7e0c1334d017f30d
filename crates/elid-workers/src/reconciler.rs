//! Aligns running workers with stored device state at process boundaries.

use crate::manager::WorkerManager;
use crate::store::RecordStore;
use elid_storage::StorageResult;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Outcome of a startup reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Devices a worker was started for
    pub started: Vec<Uuid>,
    /// Active devices that already had a worker
    pub already_running: Vec<Uuid>,
}

/// Restores workers for active devices on startup and stops them all on shutdown.
#[derive(Debug)]
pub struct Reconciler<S> {
    store: Arc<S>,
    manager: WorkerManager<S>,
}

impl<S: RecordStore> Reconciler<S> {
    pub fn new(store: Arc<S>, manager: WorkerManager<S>) -> Self {
        Self { store, manager }
    }

    /// Start a worker for every device whose stored status is active.
    ///
    /// Devices that already have a worker are left alone, so calling this
    /// more than once is harmless.
    ///
    /// # Errors
    ///
    /// Returns the store error if the active devices cannot be listed. No
    /// workers are started in that case.
    pub async fn restore(&self) -> StorageResult<ReconcileReport> {
        let devices = self.store.find_active_devices().await?;

        if devices.is_empty() {
            info!("No active devices, no workers to start");
            return Ok(ReconcileReport::default());
        }

        info!(count = devices.len(), "Restoring workers for active devices");

        let mut report = ReconcileReport::default();
        for device in devices {
            if self.manager.start(device.id, &device.name, &device.category).await {
                report.started.push(device.id);
            } else {
                report.already_running.push(device.id);
            }
        }

        info!(
            started = report.started.len(),
            already_running = report.already_running.len(),
            "Worker restore complete"
        );

        Ok(report)
    }

    /// Stop every running worker
    pub async fn shutdown(&self) {
        self.manager.stop_all().await;
    }
}
