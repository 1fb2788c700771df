//! Comparison of a recorded attempt against a reference recording.
//!
//! Both recordings are expected in the same normalized coordinate space;
//! frames are paired by index and the longer recording is truncated.

use serde::{Deserialize, Serialize};
use squats_core::{is_valid_keypoint, Keypoint, KeypointFrame};

/// Default per-axis tolerance for normalized coordinates
pub const DEFAULT_REFERENCE_THRESHOLD: f64 = 0.05;

/// A keypoint that strayed from the reference position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDeviation {
    pub frame_index: usize,
    pub keypoint: Keypoint,
    pub dx: f64,
    pub dy: f64,
}

impl ReferenceDeviation {
    pub fn message(&self) -> String {
        format!("Incorrect form at {}", self.keypoint.name())
    }
}

/// Compare paired frames keypoint by keypoint. Keypoints missing from
/// either side are not compared.
pub fn compare_to_reference(
    attempt: &[KeypointFrame],
    reference: &[KeypointFrame],
    threshold: f64,
) -> Vec<ReferenceDeviation> {
    let mut deviations = Vec::new();

    for (frame_index, (user, correct)) in attempt.iter().zip(reference).enumerate() {
        for keypoint in Keypoint::ALL {
            let (Some(u), Some(c)) = (user.get(keypoint), correct.get(keypoint)) else {
                continue;
            };
            if !is_valid_keypoint(Some(u)) || !is_valid_keypoint(Some(c)) {
                continue;
            }
            let dx = u.position.x - c.position.x;
            let dy = u.position.y - c.position.y;
            if dx.abs() > threshold || dy.abs() > threshold {
                deviations.push(ReferenceDeviation {
                    frame_index,
                    keypoint,
                    dx,
                    dy,
                });
            }
        }
    }

    deviations
}

/// Distinct deviation messages in first-seen order
pub fn deviation_messages(deviations: &[ReferenceDeviation]) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    for message in deviations.iter().map(ReferenceDeviation::message) {
        if !messages.contains(&message) {
            messages.push(message);
        }
    }
    messages
}
