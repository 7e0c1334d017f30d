//! Core constants for synthetic device transaction generation.
//!
//! This module centralizes the fixed vocabularies and numeric ranges used by
//! device workers when they fabricate transactions: the sample usernames,
//! the per-category event labels, the worker sleep bounds and the payload
//! value ranges.
//!
//! # Usage
//!
//! ```
//! use elid_core::constants::*;
//!
//! assert_eq!(SAMPLE_USERNAMES.len(), 8);
//! assert!(FACE_READER_EVENTS.contains(&"face_match"));
//! assert!(MIN_CONFIDENCE < MAX_CONFIDENCE);
//! ```

// ============================================================================
// Actors
// ============================================================================

/// Usernames a worker attributes transactions to.
///
/// Workers pick uniformly from this set on every iteration.
pub const SAMPLE_USERNAMES: [&str; 8] = [
    "john.doe",
    "jane.smith",
    "bob.jones",
    "alice.williams",
    "charlie.brown",
    "diana.prince",
    "evan.davis",
    "fiona.garcia",
];

// ============================================================================
// Event Labels
// ============================================================================

/// Event labels emitted by access controllers.
pub const ACCESS_CONTROLLER_EVENTS: [&str; 5] = [
    "access_granted",
    "access_denied",
    "door_opened",
    "door_closed",
    "access_timeout",
];

/// Event labels emitted by face readers.
pub const FACE_READER_EVENTS: [&str; 5] = [
    "face_match",
    "face_no_match",
    "face_detected",
    "multiple_faces",
    "face_recognition_error",
];

/// Event labels emitted by ANPR (number plate recognition) cameras.
pub const ANPR_EVENTS: [&str; 5] = [
    "plate_read",
    "plate_match",
    "plate_no_match",
    "invalid_plate",
    "vehicle_detected",
];

/// Fallback label set for categories the worker does not recognize.
pub const GENERIC_EVENTS: [&str; 1] = ["generic_event"];

// ============================================================================
// Worker Timing
// ============================================================================

/// Lower bound of the per-iteration worker sleep, in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 2_000;

/// Upper bound of the per-iteration worker sleep, in milliseconds.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 10_000;

/// How long `stop` waits for a cancelled worker before aborting it, in milliseconds.
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// Payload Ranges
// ============================================================================

/// Minimum recognition confidence reported in a payload.
pub const MIN_CONFIDENCE: f64 = 0.75;

/// Maximum recognition confidence reported in a payload.
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Minimum simulated processing time in milliseconds.
pub const MIN_PROCESSING_TIME_MS: u32 = 50;

/// Maximum simulated processing time in milliseconds.
pub const MAX_PROCESSING_TIME_MS: u32 = 500;

/// Minimum face image quality score.
pub const MIN_IMAGE_QUALITY: f64 = 0.6;

/// Maximum face image quality score.
pub const MAX_IMAGE_QUALITY: f64 = 1.0;

/// Number of card readers an access controller exposes (`READER-1..=READER-N`).
pub const READER_COUNT: u32 = 10;

/// Number of cameras an ANPR unit exposes (`CAM-1..=CAM-N`).
pub const CAMERA_COUNT: u32 = 5;

/// Vehicle classes an ANPR camera can report.
pub const VEHICLE_TYPES: [&str; 4] = ["car", "truck", "motorcycle", "van"];

// ============================================================================
// Listing
// ============================================================================

/// Default page size when listing transactions.
pub const DEFAULT_TRANSACTION_PAGE_SIZE: i64 = 100;
