//! Transaction-scoped operations that must read and write atomically.
//!
//! These functions accept a SQLite transaction reference so that a
//! read-modify-write sequence cannot interleave with another writer. The
//! caller owns the transaction and decides when to commit. Open it with
//! [`Database::begin_immediate`](crate::Database::begin_immediate); a
//! deferred transaction fails with `database is locked` under concurrent
//! writers once it moves from reading to writing.
//!
//! # Usage Pattern
//!
//! ```no_run
//! use elid_storage::{Database, atomic};
//! use uuid::Uuid;
//!
//! # async fn example(db: Database, device_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let mut tx = db.begin_immediate().await?;
//! let device = atomic::toggle_device_status(&mut tx, device_id).await?;
//! tx.commit().await?;
//!
//! println!("{} is now {}", device.name, device.status);
//! # Ok(())
//! # }
//! ```
//!
//! If any step returns an error the transaction is rolled back when it is
//! dropped.

use crate::error::{StorageError, StorageResult};
use crate::models::Device;
use chrono::Utc;
use sqlx::{Sqlite, Transaction as SqlTransaction};
use uuid::Uuid;

/// Fetch a device inside a transaction
pub async fn find_device(
    tx: &mut SqlTransaction<'_, Sqlite>,
    id: Uuid,
) -> StorageResult<Option<Device>> {
    let device = sqlx::query_as::<_, Device>(
        r#"
        SELECT id, name, device_type, ip_address, status, created_at, updated_at
        FROM devices
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(device)
}

/// Flip a device between `active` and `inactive` and return the updated row.
///
/// A stored status this build does not recognize is treated as inactive, so
/// the device becomes active.
///
/// # Errors
///
/// Returns [`StorageError::NotFound`] if the device does not exist.
pub async fn toggle_device_status(
    tx: &mut SqlTransaction<'_, Sqlite>,
    id: Uuid,
) -> StorageResult<Device> {
    let device = find_device(tx, id)
        .await?
        .ok_or_else(|| StorageError::device_not_found(id))?;

    let next = device.get_status().unwrap_or_default().toggled();

    sqlx::query("UPDATE devices SET status = ?, updated_at = ? WHERE id = ?")
        .bind(next.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(StorageError::from_write)?;

    find_device(tx, id)
        .await?
        .ok_or_else(|| StorageError::Internal(format!("Device {id} vanished during toggle")))
}
