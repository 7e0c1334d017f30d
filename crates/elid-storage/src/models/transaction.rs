use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Open key-value metadata attached to a transaction.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// An event recorded by a device (card swipe, face match, plate read, ...).
///
/// Transactions are write-once: there is no update path in the repository.
///
/// # Fields
///
/// * `transaction_id` - UUID primary key
/// * `device_id` - Owning device (required, cascades on device delete)
/// * `timestamp` - When the event happened on the device
/// * `username` - Person the event is attributed to
/// * `event_type` - Event label from the device category's event set
/// * `payload` - Optional structured metadata, stored as JSON text
/// * `created_at` - When the row was written
///
/// # Examples
///
/// ```
/// use elid_storage::models::{Payload, Transaction};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let mut payload = Payload::new();
/// payload.insert("confidence".into(), 0.93.into());
///
/// let tx = Transaction::new(Uuid::new_v4(), "jane.smith", "face_match", Some(payload), Utc::now());
/// assert_eq!(tx.payload().and_then(|p| p.get("confidence")).and_then(|v| v.as_f64()), Some(0.93));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub transaction_id: Uuid,

    pub device_id: Uuid,

    /// Event time
    pub timestamp: DateTime<Utc>,

    pub username: String,

    pub event_type: String,

    pub payload: Option<Json<Payload>>,

    /// Row write time
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh id.
    pub fn new(
        device_id: Uuid,
        username: impl Into<String>,
        event_type: impl Into<String>,
        payload: Option<Payload>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            device_id,
            timestamp,
            username: username.into(),
            event_type: event_type.into(),
            payload: payload.map(Json),
            created_at: Utc::now(),
        }
    }

    /// Borrow the payload map, if any.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref().map(|json| &json.0)
    }
}
