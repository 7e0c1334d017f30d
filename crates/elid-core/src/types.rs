use crate::{
    Result,
    constants::{ACCESS_CONTROLLER_EVENTS, ANPR_EVENTS, FACE_READER_EVENTS, GENERIC_EVENTS},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a registered device.
///
/// The set is closed: a device can only be created with one of these
/// categories. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    /// Door / turnstile access controller with card readers.
    AccessController,
    /// Facial recognition terminal.
    FaceReader,
    /// Automatic number plate recognition camera.
    Anpr,
}

impl DeviceCategory {
    /// All known categories, in declaration order.
    pub const ALL: [DeviceCategory; 3] = [Self::AccessController, Self::FaceReader, Self::Anpr];

    /// Stored / wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessController => "access_controller",
            Self::FaceReader => "face_reader",
            Self::Anpr => "anpr",
        }
    }

    /// Event labels a device of this category can emit.
    #[must_use]
    pub fn event_labels(&self) -> &'static [&'static str] {
        match self {
            Self::AccessController => &ACCESS_CONTROLLER_EVENTS,
            Self::FaceReader => &FACE_READER_EVENTS,
            Self::Anpr => &ANPR_EVENTS,
        }
    }
}

/// Event labels for an optional category, falling back to the generic set.
///
/// Workers are started with whatever category string the store holds; a
/// category this build does not know about still produces events.
///
/// ```
/// use elid_core::{DeviceCategory, event_labels_for};
///
/// assert_eq!(event_labels_for(Some(DeviceCategory::Anpr)).len(), 5);
/// assert_eq!(event_labels_for(None), &["generic_event"]);
/// ```
#[must_use]
pub fn event_labels_for(category: Option<DeviceCategory>) -> &'static [&'static str] {
    match category {
        Some(category) => category.event_labels(),
        None => &GENERIC_EVENTS,
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceCategory {
    type Err = Error;

    /// Parses a category name, case-insensitively and ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "access_controller" => Ok(Self::AccessController),
            "face_reader" => Ok(Self::FaceReader),
            "anpr" => Ok(Self::Anpr),
            _ => Err(Error::InvalidDeviceCategory(s.to_string())),
        }
    }
}

/// Activation state of a device.
///
/// A device is `Active` exactly when a worker is generating transactions for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    Inactive,
    Active,
}

impl DeviceStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }

    /// The opposite state.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Inactive => Self::Active,
            Self::Active => Self::Inactive,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            _ => Err(Error::InvalidDeviceStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("access_controller", DeviceCategory::AccessController)]
    #[case("face_reader", DeviceCategory::FaceReader)]
    #[case("anpr", DeviceCategory::Anpr)]
    #[case("  ANPR ", DeviceCategory::Anpr)]
    #[case("Face_Reader", DeviceCategory::FaceReader)]
    fn test_category_valid(#[case] input: &str, #[case] expected: DeviceCategory) {
        let category: DeviceCategory = input.parse().unwrap();
        assert_eq!(category, expected);
    }

    #[rstest]
    #[case("")]
    #[case("turnstile")]
    #[case("face-reader")]
    fn test_category_invalid(#[case] input: &str) {
        let result: Result<DeviceCategory> = input.parse();
        assert_eq!(result, Err(Error::InvalidDeviceCategory(input.to_string())));
    }

    #[test]
    fn test_category_round_trips_through_display() {
        for category in DeviceCategory::ALL {
            assert_eq!(category.to_string().parse::<DeviceCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&DeviceCategory::AccessController).unwrap();
        assert_eq!(json, "\"access_controller\"");
    }

    #[test]
    fn test_each_category_has_five_labels() {
        for category in DeviceCategory::ALL {
            assert_eq!(category.event_labels().len(), 5);
        }
    }

    #[test]
    fn test_unknown_category_falls_back_to_generic() {
        assert_eq!(event_labels_for(None), &["generic_event"]);
        assert!(event_labels_for(Some(DeviceCategory::FaceReader)).contains(&"face_match"));
    }

    #[rstest]
    #[case("inactive", DeviceStatus::Inactive)]
    #[case("active", DeviceStatus::Active)]
    #[case("ACTIVE", DeviceStatus::Active)]
    fn test_status_valid(#[case] input: &str, #[case] expected: DeviceStatus) {
        assert_eq!(input.parse::<DeviceStatus>(), Ok(expected));
    }

    #[test]
    fn test_status_invalid() {
        assert!("paused".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(DeviceStatus::Inactive.toggled(), DeviceStatus::Active);
        assert_eq!(DeviceStatus::Active.toggled(), DeviceStatus::Inactive);
        assert_eq!(DeviceStatus::default(), DeviceStatus::Inactive);
        assert!(DeviceStatus::Active.is_active());
    }
}
