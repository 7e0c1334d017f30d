//! Appends transaction records on behalf of devices.

use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use elid_storage::{Payload, StorageError, StorageResult, Transaction};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Records device events as transactions in the record store.
///
/// Each call is independent and safe to run concurrently with calls for the
/// same or other devices.
#[derive(Debug)]
pub struct TransactionEmitter<S> {
    store: Arc<S>,
}

impl<S> Clone for TransactionEmitter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> TransactionEmitter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append one transaction for `device_id` and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the device does not exist, in
    /// which case nothing is written. Other store failures are passed through.
    pub async fn emit(
        &self,
        device_id: Uuid,
        username: &str,
        event_label: &str,
        payload: Option<Payload>,
        timestamp: DateTime<Utc>,
    ) -> StorageResult<Transaction> {
        if !self.store.device_exists(device_id).await? {
            return Err(StorageError::device_not_found(device_id));
        }

        let transaction = Transaction::new(device_id, username, event_label, payload, timestamp);
        let stored = self.store.insert_transaction(transaction).await?;

        debug!(
            device_id = %device_id,
            transaction_id = %stored.transaction_id,
            username = %stored.username,
            event = %stored.event_type,
            "Transaction recorded"
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;

    #[tokio::test]
    async fn test_emit_stores_all_fields() {
        let store = Arc::new(MemoryStore::new());
        let device = store.add_device("Front door", "access_controller", true);
        let emitter = TransactionEmitter::new(Arc::clone(&store));

        let mut payload = Payload::new();
        payload.insert("card_number".into(), "1234-5678".into());
        let at = Utc::now();

        let record = emitter
            .emit(device, "alice.williams", "door_opened", Some(payload.clone()), at)
            .await
            .unwrap();

        assert_eq!(record.device_id, device);
        assert_eq!(record.username, "alice.williams");
        assert_eq!(record.event_type, "door_opened");
        assert_eq!(record.timestamp, at);
        assert_eq!(record.payload(), Some(&payload));
        assert_eq!(store.transactions(), vec![record]);
    }

    #[tokio::test]
    async fn test_emit_for_unknown_device_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let emitter = TransactionEmitter::new(Arc::clone(&store));

        let err = emitter
            .emit(Uuid::new_v4(), "john.doe", "access_denied", None, Utc::now())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.insert_attempts(), 0);
        assert!(store.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_emit_without_payload() {
        let store = Arc::new(MemoryStore::new());
        let device = store.add_device("Cam", "anpr", true);
        let emitter = TransactionEmitter::new(Arc::clone(&store));

        let record = emitter
            .emit(device, "evan.davis", "vehicle_detected", None, Utc::now())
            .await
            .unwrap();

        assert!(record.payload().is_none());
    }
}
