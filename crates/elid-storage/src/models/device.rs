use chrono::{DateTime, Utc};
use elid_core::{DeviceCategory, DeviceStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered access-control device.
///
/// `device_type` and `status` hold the stored names rather than the
/// [`DeviceCategory`] / [`DeviceStatus`] enums, the same way the columns
/// are laid out. Use [`Device::get_category`] and [`Device::get_status`]
/// for the typed view.
///
/// # Database Schema
///
/// Maps to the `devices` table:
/// - `id` is a UUID stored as a 16-byte BLOB
/// - `device_type` and `status` are guarded by CHECK constraints
/// - deleting a row cascades to the device's `transactions`
///
/// # Examples
///
/// ```
/// use elid_storage::models::Device;
/// use elid_core::{DeviceCategory, DeviceStatus};
///
/// let device = Device::new("Lobby camera", DeviceCategory::Anpr, "10.0.0.12");
///
/// assert_eq!(device.get_category(), Some(DeviceCategory::Anpr));
/// assert_eq!(device.get_status(), Some(DeviceStatus::Inactive));
/// assert!(!device.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Category name (`access_controller`, `face_reader`, `anpr`)
    pub device_type: String,

    /// Network address the device is reachable at
    pub ip_address: String,

    /// Activation state name (`inactive`, `active`)
    pub status: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Build a new, inactive device with a fresh id.
    pub fn new(
        name: impl Into<String>,
        category: DeviceCategory,
        ip_address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            device_type: category.as_str().to_string(),
            ip_address: ip_address.into(),
            status: DeviceStatus::Inactive.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Category as an enum, `None` if the stored name is unknown to this build.
    pub fn get_category(&self) -> Option<DeviceCategory> {
        self.device_type.parse().ok()
    }

    /// Status as an enum, `None` if the stored name is unknown to this build.
    pub fn get_status(&self) -> Option<DeviceStatus> {
        self.status.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.get_status().is_some_and(|s| s.is_active())
    }
}
