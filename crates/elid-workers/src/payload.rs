//! Synthetic event content.
//!
//! Workers attach a metadata payload to every transaction they record. The
//! payload shape depends on the device category: card readers report card
//! numbers, face readers report face ids and image quality, ANPR cameras
//! report plates and vehicle classes. Every payload carries a confidence
//! score and a processing time.
//!
//! Generation is a pure function of the random source, so a seeded RNG
//! reproduces the same payloads:
//!
//! ```
//! use elid_core::DeviceCategory;
//! use elid_workers::payload::generate_payload;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let a = generate_payload(&mut StdRng::seed_from_u64(7), Some(DeviceCategory::Anpr), "plate_read");
//! let b = generate_payload(&mut StdRng::seed_from_u64(7), Some(DeviceCategory::Anpr), "plate_read");
//! assert_eq!(a, b);
//! assert!(a.contains_key("plate_number"));
//! ```

use elid_core::DeviceCategory;
use elid_core::constants::{
    CAMERA_COUNT, MAX_CONFIDENCE, MAX_IMAGE_QUALITY, MAX_PROCESSING_TIME_MS, MIN_CONFIDENCE,
    MIN_IMAGE_QUALITY, MIN_PROCESSING_TIME_MS, READER_COUNT, VEHICLE_TYPES,
};
use elid_storage::Payload;
use rand::{Rng, RngCore};
use serde_json::json;

/// Produces the metadata payload for a device event.
///
/// Implementations must not block or perform I/O; they run inline in the
/// worker loop between the sleep and the store write.
pub trait EventContentProducer: Send + Sync + 'static {
    /// Build the payload for an event of `event_label` on a device of `category`.
    ///
    /// `category` is `None` when the device's stored category is not one this
    /// build knows about.
    fn produce(
        &self,
        rng: &mut dyn RngCore,
        category: Option<DeviceCategory>,
        event_label: &str,
    ) -> Payload;
}

/// Default producer backed by [`generate_payload`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticPayloadProducer;

impl EventContentProducer for SyntheticPayloadProducer {
    fn produce(
        &self,
        rng: &mut dyn RngCore,
        category: Option<DeviceCategory>,
        event_label: &str,
    ) -> Payload {
        generate_payload(rng, category, event_label)
    }
}

/// Generate a payload for the given category.
///
/// The event label does not influence the generated fields; it is accepted
/// so that producers keyed on (category, label) share one signature.
pub fn generate_payload<R: Rng + ?Sized>(
    rng: &mut R,
    category: Option<DeviceCategory>,
    _event_label: &str,
) -> Payload {
    let mut payload = Payload::new();
    payload.insert(
        "confidence".into(),
        json!(round2(rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE))),
    );
    payload.insert(
        "processing_time_ms".into(),
        json!(rng.gen_range(MIN_PROCESSING_TIME_MS..=MAX_PROCESSING_TIME_MS)),
    );

    match category {
        Some(DeviceCategory::AccessController) => {
            payload.insert(
                "card_number".into(),
                json!(format!(
                    "{}-{}",
                    rng.gen_range(1000..=9999),
                    rng.gen_range(1000..=9999)
                )),
            );
            payload.insert(
                "reader_id".into(),
                json!(format!("READER-{}", rng.gen_range(1..=READER_COUNT))),
            );
        }
        Some(DeviceCategory::FaceReader) => {
            payload.insert(
                "face_id".into(),
                json!(format!("FACE-{}", rng.gen_range(1000..=9999))),
            );
            payload.insert(
                "image_quality".into(),
                json!(round2(rng.gen_range(MIN_IMAGE_QUALITY..=MAX_IMAGE_QUALITY))),
            );
        }
        Some(DeviceCategory::Anpr) => {
            payload.insert("plate_number".into(), json!(plate_number(rng)));
            payload.insert(
                "camera_id".into(),
                json!(format!("CAM-{}", rng.gen_range(1..=CAMERA_COUNT))),
            );
            payload.insert(
                "vehicle_type".into(),
                json!(VEHICLE_TYPES[rng.gen_range(0..VEHICLE_TYPES.len())]),
            );
        }
        None => {}
    }

    payload
}

/// `ABC-1234`
fn plate_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut plate = String::with_capacity(8);
    for _ in 0..3 {
        plate.push(char::from(rng.gen_range(b'A'..=b'Z')));
    }
    plate.push('-');
    for _ in 0..4 {
        plate.push(char::from(rng.gen_range(b'0'..=b'9')));
    }
    plate
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
