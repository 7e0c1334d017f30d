use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid device_type '{0}'. Must be one of: access_controller, face_reader, anpr")]
    InvalidDeviceCategory(String),

    #[error("Invalid device status '{0}'. Must be one of: inactive, active")]
    InvalidDeviceStatus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
