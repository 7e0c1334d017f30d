//! Device workers for the ELID access-control registry.
//!
//! Every device whose stored status is active has exactly one worker: a
//! background task that records a synthetic access event for the device at
//! random intervals. This crate owns the worker lifecycle and everything a
//! worker needs to do its job.
//!
//! # Architecture
//!
//! - [`WorkerManager`] - registry of running workers; start, stop, stop all
//! - [`Reconciler`] - restores workers for active devices at startup and
//!   stops them at shutdown
//! - [`DeviceService`] - device operations that keep workers in step with
//!   the store
//! - [`TransactionEmitter`] - appends one transaction record
//! - [`payload`] - per-category event content
//! - [`RecordStore`] - the storage seam, implemented for
//!   [`elid_storage::Database`] and [`mock::MemoryStore`]
//!
//! # Examples
//!
//! ```no_run
//! use elid_storage::Database;
//! use elid_workers::{Reconciler, WorkerConfig, WorkerManager};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::in_memory().await?);
//! let manager = WorkerManager::new(Arc::clone(&db), WorkerConfig::default());
//! let reconciler = Reconciler::new(db, manager.clone());
//!
//! let report = reconciler.restore().await?;
//! println!("{} workers started", report.started.len());
//!
//! reconciler.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod emitter;
pub mod manager;
pub mod mock;
pub mod payload;
pub mod reconciler;
pub mod service;
pub mod store;

pub use config::{ConfigError, WorkerConfig};
pub use emitter::TransactionEmitter;
pub use manager::{WorkerInfo, WorkerManager};
pub use payload::{EventContentProducer, SyntheticPayloadProducer};
pub use reconciler::{ReconcileReport, Reconciler};
pub use service::{DeviceService, WorkerStatus};
pub use store::{ActiveDevice, RecordStore};
