pub mod device;
pub mod transaction;

pub use device::{DeviceRepository, SqliteDeviceRepository};
pub use transaction::{SqliteTransactionRepository, TransactionRepository};
