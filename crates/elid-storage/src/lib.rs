//! Storage layer for the ELID device registry.
//!
//! This crate provides SQLite-backed persistence for access-control devices
//! and the transactions they record.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool manager with embedded migrations
//! - [`DeviceRepository`], [`TransactionRepository`] - Data access traits
//! - [`atomic`] - Read-modify-write operations scoped to one SQL transaction
//!
//! # Schema
//!
//! Two tables, created by the migrations in the workspace `migrations/` directory:
//!
//! - `devices` - one row per registered device; category and status are
//!   constrained to their known names
//! - `transactions` - append-only device events; `device_id` references
//!   `devices(id)` with `ON DELETE CASCADE`, so removing a device removes its
//!   history
//!
//! Foreign keys are switched on for every connection.
//!
//! # Examples
//!
//! ```no_run
//! use elid_storage::{Database, DatabaseConfig, Device};
//! use elid_storage::repositories::{DeviceRepository, SqliteDeviceRepository};
//! use elid_core::DeviceCategory;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("elid.db")).await?;
//! let devices = SqliteDeviceRepository::new(db.pool().clone());
//!
//! let reader = Device::new("Reception", DeviceCategory::FaceReader, "192.168.0.40");
//! devices.create(&reader).await?;
//!
//! for device in devices.find_active().await? {
//!     println!("{} ({}) is active", device.name, device.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{Device, Payload, Transaction};
pub use repositories::{
    DeviceRepository, SqliteDeviceRepository, SqliteTransactionRepository, TransactionRepository,
};
