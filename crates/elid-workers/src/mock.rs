//! In-memory record store for testing and development.
//!
//! [`MemoryStore`] implements [`RecordStore`] over plain collections so
//! worker behavior can be exercised without SQLite, including under paused
//! Tokio time.

use crate::store::{ActiveDevice, RecordStore};
use elid_storage::{StorageError, StorageResult, Transaction};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// In-memory record store.
///
/// # Examples
///
/// ```
/// use elid_workers::mock::MemoryStore;
/// use elid_workers::store::RecordStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryStore::new();
///     let gate = store.add_device("Gate", "access_controller", true);
///
///     assert!(store.device_exists(gate).await.unwrap());
///     assert_eq!(store.find_active_devices().await.unwrap().len(), 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Simulated latency of each insert
    insert_delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct State {
    devices: HashMap<Uuid, StoredDevice>,
    transactions: Vec<Transaction>,
    insert_attempts: usize,
}

#[derive(Debug, Clone)]
struct StoredDevice {
    name: String,
    category: String,
    active: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every insert by `delay` before it is applied
    pub fn with_insert_delay(mut self, delay: Duration) -> Self {
        self.insert_delay = Some(delay);
        self
    }

    /// Register a device and return its id
    pub fn add_device(&self, name: &str, category: &str, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_device(id, name, category, active);
        id
    }

    /// Register a device under a caller-chosen id, replacing any existing entry
    pub fn insert_device(&self, id: Uuid, name: &str, category: &str, active: bool) {
        self.state().devices.insert(
            id,
            StoredDevice {
                name: name.to_string(),
                category: category.to_string(),
                active,
            },
        );
    }

    /// Remove a device together with its transactions
    pub fn remove_device(&self, id: Uuid) -> bool {
        let mut state = self.state();
        state.transactions.retain(|t| t.device_id != id);
        state.devices.remove(&id).is_some()
    }

    /// All stored transactions, oldest first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state().transactions.clone()
    }

    /// Stored transactions of one device, oldest first
    pub fn transactions_for(&self, device_id: Uuid) -> Vec<Transaction> {
        self.state()
            .transactions
            .iter()
            .filter(|t| t.device_id == device_id)
            .cloned()
            .collect()
    }

    /// Number of insert calls, successful or not
    pub fn insert_attempts(&self) -> usize {
        self.state().insert_attempts
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryStore {
    async fn find_active_devices(&self) -> StorageResult<Vec<ActiveDevice>> {
        Ok(self
            .state()
            .devices
            .iter()
            .filter(|(_, d)| d.active)
            .map(|(id, d)| ActiveDevice {
                id: *id,
                name: d.name.clone(),
                category: d.category.clone(),
            })
            .collect())
    }

    async fn device_exists(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.state().devices.contains_key(&id))
    }

    async fn insert_transaction(&self, transaction: Transaction) -> StorageResult<Transaction> {
        self.state().insert_attempts += 1;

        if let Some(delay) = self.insert_delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if !state.devices.contains_key(&transaction.device_id) {
            return Err(StorageError::device_not_found(transaction.device_id));
        }
        state.transactions.push(transaction.clone());

        Ok(transaction)
    }
}
