pub mod device;
pub mod transaction;

pub use device::Device;
pub use transaction::{Payload, Transaction};
