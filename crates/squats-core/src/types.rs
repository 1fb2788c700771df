//! Fundamental types for the squats form-evaluation system.

use chrono::{DateTime, Utc};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one exercise analysis session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1_000_000_000.0) as i64)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is in the future)
    pub fn secs_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / 1_000_000_000.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// 2D position in the pose model's image coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The upstream model reports undetected keypoints at exactly (0, 0)
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.to_nalgebra() - other.to_nalgebra()).norm()
    }

    /// Vector pointing from `self` to `other`
    pub fn vector_to(&self, other: &Self) -> Vector2<f64> {
        other.to_nalgebra() - self.to_nalgebra()
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Keypoint schema: the 17 COCO joints extended with big-toe points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
    // Extended points for ankle dorsiflexion
    LeftBigToe = 17,
    RightBigToe = 18,
}

impl Keypoint {
    pub const COUNT: usize = 19;

    pub const ALL: [Keypoint; Keypoint::COUNT] = [
        Keypoint::Nose,
        Keypoint::LeftEye,
        Keypoint::RightEye,
        Keypoint::LeftEar,
        Keypoint::RightEar,
        Keypoint::LeftShoulder,
        Keypoint::RightShoulder,
        Keypoint::LeftElbow,
        Keypoint::RightElbow,
        Keypoint::LeftWrist,
        Keypoint::RightWrist,
        Keypoint::LeftHip,
        Keypoint::RightHip,
        Keypoint::LeftKnee,
        Keypoint::RightKnee,
        Keypoint::LeftAnkle,
        Keypoint::RightAnkle,
        Keypoint::LeftBigToe,
        Keypoint::RightBigToe,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left eye",
            Self::RightEye => "right eye",
            Self::LeftEar => "left ear",
            Self::RightEar => "right ear",
            Self::LeftShoulder => "left shoulder",
            Self::RightShoulder => "right shoulder",
            Self::LeftElbow => "left elbow",
            Self::RightElbow => "right elbow",
            Self::LeftWrist => "left wrist",
            Self::RightWrist => "right wrist",
            Self::LeftHip => "left hip",
            Self::RightHip => "right hip",
            Self::LeftKnee => "left knee",
            Self::RightKnee => "right knee",
            Self::LeftAnkle => "left ankle",
            Self::RightAnkle => "right ankle",
            Self::LeftBigToe => "left big toe",
            Self::RightBigToe => "right big toe",
        }
    }
}

/// Keypoint detection with optional confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointDetection {
    pub keypoint: Keypoint,
    pub position: Position2D,
    pub confidence: Option<f32>,
}

impl KeypointDetection {
    pub fn new(keypoint: Keypoint, position: Position2D, confidence: Option<f32>) -> Self {
        Self {
            keypoint,
            position,
            confidence,
        }
    }
}

/// All keypoints reported for a single video frame, addressed by [`Keypoint`] index
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeypointFrame {
    pub keypoints: [Option<KeypointDetection>; Keypoint::COUNT],
}

impl KeypointFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from the upstream model's ordered slot array.
    ///
    /// Slots beyond the schema are ignored; a short array leaves the
    /// remaining keypoints absent.
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<(Position2D, Option<f32>)>>,
    {
        let mut frame = Self::new();
        for (slot, keypoint) in slots.into_iter().zip(Keypoint::ALL) {
            frame.keypoints[keypoint.index()] = slot
                .map(|(position, confidence)| KeypointDetection::new(keypoint, position, confidence));
        }
        frame
    }

    pub fn set(&mut self, keypoint: Keypoint, position: Position2D) {
        self.keypoints[keypoint.index()] = Some(KeypointDetection::new(keypoint, position, None));
    }

    pub fn with(mut self, keypoint: Keypoint, x: f64, y: f64) -> Self {
        self.set(keypoint, Position2D::new(x, y));
        self
    }

    pub fn clear(&mut self, keypoint: Keypoint) {
        self.keypoints[keypoint.index()] = None;
    }

    pub fn get(&self, keypoint: Keypoint) -> Option<&KeypointDetection> {
        self.keypoints[keypoint.index()].as_ref()
    }

    /// Index-based lookup; out-of-range indices read as absent
    pub fn get_index(&self, idx: usize) -> Option<&KeypointDetection> {
        self.keypoints.get(idx).and_then(|slot| slot.as_ref())
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.iter().all(|kp| kp.is_none())
    }

    /// Number of slots holding a usable (present, non-origin) keypoint
    pub fn detected_count(&self) -> usize {
        self.keypoints
            .iter()
            .flatten()
            .filter(|kp| !kp.position.is_origin())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position2D::new(0.0, 0.0);
        let p2 = Position2D::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_keypoint_index_roundtrip() {
        for i in 0..Keypoint::COUNT {
            let kp = Keypoint::from_index(i).unwrap();
            assert_eq!(kp.index(), i);
        }
        assert!(Keypoint::from_index(Keypoint::COUNT).is_none());
    }

    #[test]
    fn test_frame_from_short_slot_array() {
        let slots = vec![Some((Position2D::new(1.0, 2.0), Some(0.9))); 17];
        let frame = KeypointFrame::from_slots(slots);

        assert_eq!(frame.len(), Keypoint::COUNT);
        assert!(frame.get(Keypoint::RightAnkle).is_some());
        assert!(frame.get(Keypoint::LeftBigToe).is_none());
        assert!(frame.get(Keypoint::RightBigToe).is_none());
    }

    #[test]
    fn test_frame_from_long_slot_array() {
        let slots = vec![Some((Position2D::new(1.0, 2.0), None)); 25];
        let frame = KeypointFrame::from_slots(slots);
        assert_eq!(frame.detected_count(), Keypoint::COUNT);
        assert_eq!(frame.get(Keypoint::Nose).unwrap().keypoint, Keypoint::Nose);
    }

    #[test]
    fn test_detected_count_ignores_origin() {
        let frame = KeypointFrame::new()
            .with(Keypoint::LeftShoulder, 10.0, 10.0)
            .with(Keypoint::RightShoulder, 0.0, 0.0);
        assert_eq!(frame.detected_count(), 1);
        assert!(frame.get_index(100).is_none());
    }

    #[test]
    fn test_timestamp_secs_since() {
        let a = Timestamp::from_secs_f64(1.0);
        let b = Timestamp::from_secs_f64(3.5);
        assert!((b.secs_since(a) - 2.5).abs() < 1e-9);
    }
}
