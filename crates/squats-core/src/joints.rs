//! Named joint angles and body distances computed from a keypoint frame.
//!
//! The joint table below is the single anatomical reference for every
//! exercise rule: each angle is measured at the middle keypoint of its
//! triple.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{angle_at, distance, is_valid_keypoint};
use crate::types::{Keypoint, KeypointFrame, Position2D};

/// Fixed vocabulary of measured joint angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointName {
    #[serde(rename = "Right Elbow")]
    RightElbow,
    #[serde(rename = "Left Elbow")]
    LeftElbow,
    #[serde(rename = "Right Knee")]
    RightKnee,
    #[serde(rename = "Left Knee")]
    LeftKnee,
    #[serde(rename = "Right Hip")]
    RightHip,
    #[serde(rename = "Left Hip")]
    LeftHip,
    #[serde(rename = "Right Shoulder Flexion")]
    RightShoulderFlexion,
    #[serde(rename = "Left Shoulder Flexion")]
    LeftShoulderFlexion,
    #[serde(rename = "Spine Angle")]
    SpineAngle,
    #[serde(rename = "Right Ankle Dorsiflexion")]
    RightAnkleDorsiflexion,
    #[serde(rename = "Left Ankle Dorsiflexion")]
    LeftAnkleDorsiflexion,
}

impl JointName {
    pub const COUNT: usize = 11;

    pub const ALL: [JointName; JointName::COUNT] = [
        JointName::RightElbow,
        JointName::LeftElbow,
        JointName::RightKnee,
        JointName::LeftKnee,
        JointName::RightHip,
        JointName::LeftHip,
        JointName::RightShoulderFlexion,
        JointName::LeftShoulderFlexion,
        JointName::SpineAngle,
        JointName::RightAnkleDorsiflexion,
        JointName::LeftAnkleDorsiflexion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RightElbow => "Right Elbow",
            Self::LeftElbow => "Left Elbow",
            Self::RightKnee => "Right Knee",
            Self::LeftKnee => "Left Knee",
            Self::RightHip => "Right Hip",
            Self::LeftHip => "Left Hip",
            Self::RightShoulderFlexion => "Right Shoulder Flexion",
            Self::LeftShoulderFlexion => "Left Shoulder Flexion",
            Self::SpineAngle => "Spine Angle",
            Self::RightAnkleDorsiflexion => "Right Ankle Dorsiflexion",
            Self::LeftAnkleDorsiflexion => "Left Ankle Dorsiflexion",
        }
    }

    /// Keypoint triple `(a, vertex, c)` defining this joint's angle
    pub fn triple(&self) -> [Keypoint; 3] {
        use Keypoint::*;
        match self {
            Self::RightElbow => [RightShoulder, RightElbow, RightWrist],
            Self::LeftElbow => [LeftShoulder, LeftElbow, LeftWrist],
            Self::RightKnee => [RightHip, RightKnee, RightAnkle],
            Self::LeftKnee => [LeftHip, LeftKnee, LeftAnkle],
            Self::RightHip => [RightShoulder, RightHip, RightKnee],
            Self::LeftHip => [LeftShoulder, LeftHip, LeftKnee],
            Self::RightShoulderFlexion => [RightHip, RightShoulder, RightElbow],
            Self::LeftShoulderFlexion => [LeftHip, LeftShoulder, LeftElbow],
            Self::SpineAngle => [RightShoulder, RightHip, LeftShoulder],
            Self::RightAnkleDorsiflexion => [RightKnee, RightAnkle, RightBigToe],
            Self::LeftAnkleDorsiflexion => [LeftKnee, LeftAnkle, LeftBigToe],
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JointName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|joint| joint.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown joint: {s}")))
    }
}

/// Joint → keypoint-index table used by [`compute_joint_angles_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct JointTable {
    entries: Vec<(JointName, [usize; 3])>,
}

impl JointTable {
    /// Build a table from raw keypoint indices, rejecting indices that do
    /// not address a slot in a [`KeypointFrame`].
    pub fn new(entries: Vec<(JointName, [usize; 3])>) -> Result<Self> {
        for (_, triple) in &entries {
            if let Some(&index) = triple.iter().find(|&&i| i >= Keypoint::COUNT) {
                return Err(Error::KeypointTable {
                    index,
                    len: Keypoint::COUNT,
                });
            }
        }
        Ok(Self { entries })
    }

    /// The anatomical table for all eleven joints
    pub fn standard() -> Self {
        let entries = JointName::ALL
            .into_iter()
            .map(|joint| {
                let [a, b, c] = joint.triple();
                (joint, [a.index(), b.index(), c.index()])
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(JointName, [usize; 3])] {
        &self.entries
    }
}

impl Default for JointTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Joint angles (degrees) for one frame; an absent joint could not be measured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSet(BTreeMap<JointName, f64>);

impl JointAngleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: JointName) -> Option<f64> {
        self.0.get(&joint).copied()
    }

    pub fn insert(&mut self, joint: JointName, degrees: f64) {
        self.0.insert(joint, degrees);
    }

    pub fn with(mut self, joint: JointName, degrees: f64) -> Self {
        self.insert(joint, degrees);
        self
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.0.contains_key(&joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, f64)> + '_ {
        self.0.iter().map(|(joint, degrees)| (*joint, *degrees))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(JointName, f64)> for JointAngleSet {
    fn from_iter<I: IntoIterator<Item = (JointName, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Named body distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DistanceMetric {
    #[serde(rename = "Shoulder Width")]
    ShoulderWidth,
    #[serde(rename = "Hip Width")]
    HipWidth,
    #[serde(rename = "Spine Length")]
    SpineLength,
}

impl DistanceMetric {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShoulderWidth => "Shoulder Width",
            Self::HipWidth => "Hip Width",
            Self::SpineLength => "Spine Length",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body distances in keypoint-coordinate units for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointDistanceSet(BTreeMap<DistanceMetric, f64>);

impl JointDistanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: DistanceMetric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn insert(&mut self, metric: DistanceMetric, value: f64) {
        self.0.insert(metric, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DistanceMetric, f64)> + '_ {
        self.0.iter().map(|(metric, value)| (*metric, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute all joint angles with the standard anatomical table
pub fn compute_joint_angles(frame: &KeypointFrame) -> JointAngleSet {
    compute_joint_angles_with(&JointTable::standard(), frame)
}

/// Compute joint angles for every table entry whose three keypoints are
/// valid and non-degenerate. Other joints are left out of the set.
pub fn compute_joint_angles_with(table: &JointTable, frame: &KeypointFrame) -> JointAngleSet {
    let mut angles = JointAngleSet::new();

    for (joint, [a, b, c]) in table.entries() {
        let points = [frame.get_index(*a), frame.get_index(*b), frame.get_index(*c)];
        if !points.iter().all(|kp| is_valid_keypoint(*kp)) {
            continue;
        }
        let [Some(pa), Some(pb), Some(pc)] = points else {
            continue;
        };
        if let Some(degrees) = angle_at(&pa.position, &pb.position, &pc.position) {
            angles.insert(*joint, degrees);
        }
    }

    angles
}

fn valid_position(frame: &KeypointFrame, keypoint: Keypoint) -> Option<Position2D> {
    frame
        .get(keypoint)
        .filter(|kp| is_valid_keypoint(Some(*kp)))
        .map(|kp| kp.position)
}

/// Compute shoulder width, hip width and spine length where the inputs allow
pub fn compute_joint_distances(frame: &KeypointFrame) -> JointDistanceSet {
    let mut distances = JointDistanceSet::new();

    let left_shoulder = valid_position(frame, Keypoint::LeftShoulder);
    let right_shoulder = valid_position(frame, Keypoint::RightShoulder);
    let left_hip = valid_position(frame, Keypoint::LeftHip);
    let right_hip = valid_position(frame, Keypoint::RightHip);

    if let (Some(ls), Some(rs)) = (left_shoulder, right_shoulder) {
        distances.insert(DistanceMetric::ShoulderWidth, distance(&ls, &rs));
    }

    if let (Some(lh), Some(rh)) = (left_hip, right_hip) {
        distances.insert(DistanceMetric::HipWidth, distance(&lh, &rh));
    }

    if let (Some(ls), Some(rs), Some(lh), Some(rh)) = (left_shoulder, right_shoulder, left_hip, right_hip) {
        let shoulders = ls.midpoint(&rs);
        let pelvis = lh.midpoint(&rh);
        distances.insert(DistanceMetric::SpineLength, distance(&shoulders, &pelvis));
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upright figure facing the camera with arms bent at the elbow
    fn standing_frame() -> KeypointFrame {
        KeypointFrame::new()
            .with(Keypoint::Nose, 50.0, 10.0)
            .with(Keypoint::LeftShoulder, 60.0, 30.0)
            .with(Keypoint::RightShoulder, 40.0, 30.0)
            .with(Keypoint::LeftElbow, 60.0, 50.0)
            .with(Keypoint::RightElbow, 40.0, 50.0)
            .with(Keypoint::LeftWrist, 70.0, 50.0)
            .with(Keypoint::RightWrist, 30.0, 50.0)
            .with(Keypoint::LeftHip, 58.0, 70.0)
            .with(Keypoint::RightHip, 42.0, 70.0)
            .with(Keypoint::LeftKnee, 58.0, 100.0)
            .with(Keypoint::RightKnee, 42.0, 100.0)
            .with(Keypoint::LeftAnkle, 58.0, 130.0)
            .with(Keypoint::RightAnkle, 42.0, 130.0)
            .with(Keypoint::LeftBigToe, 68.0, 130.0)
            .with(Keypoint::RightBigToe, 32.0, 130.0)
    }

    #[test]
    fn test_all_joints_present_for_full_frame() {
        let angles = compute_joint_angles(&standing_frame());
        assert_eq!(angles.len(), JointName::COUNT);

        assert!((angles.get(JointName::RightElbow).unwrap() - 90.0).abs() < 1e-9);
        assert!((angles.get(JointName::LeftKnee).unwrap() - 180.0).abs() < 1e-9);
        assert!((angles.get(JointName::RightAnkleDorsiflexion).unwrap() - 90.0).abs() < 1e-9);
        for (_, degrees) in angles.iter() {
            assert!((0.0..=180.0).contains(&degrees));
        }
    }

    #[test]
    fn test_right_arm_at_origin_omits_right_elbow() {
        let frame = standing_frame()
            .with(Keypoint::RightShoulder, 0.0, 0.0)
            .with(Keypoint::RightElbow, 0.0, 0.0)
            .with(Keypoint::RightWrist, 0.0, 0.0);

        let angles = compute_joint_angles(&frame);
        assert!(!angles.contains(JointName::RightElbow));
        assert!(!angles.contains(JointName::RightShoulderFlexion));
        assert!(!angles.contains(JointName::SpineAngle));
        assert!(angles.contains(JointName::LeftElbow));
    }

    #[test]
    fn test_single_invalid_keypoint_omits_dependent_joints() {
        let mut frame = standing_frame();
        frame.clear(Keypoint::LeftAnkle);

        let angles = compute_joint_angles(&frame);
        assert!(angles.get(JointName::LeftKnee).is_none());
        assert!(angles.get(JointName::LeftAnkleDorsiflexion).is_none());
        assert!(angles.get(JointName::RightKnee).is_some());
    }

    #[test]
    fn test_missing_toes_omit_dorsiflexion() {
        let mut frame = standing_frame();
        frame.clear(Keypoint::LeftBigToe);
        frame.clear(Keypoint::RightBigToe);

        let angles = compute_joint_angles(&frame);
        assert_eq!(angles.len(), JointName::COUNT - 2);
    }

    #[test]
    fn test_degenerate_joint_is_omitted() {
        // Wrist sitting exactly on the elbow
        let frame = standing_frame().with(Keypoint::RightWrist, 40.0, 50.0);
        let angles = compute_joint_angles(&frame);
        assert!(!angles.contains(JointName::RightElbow));
    }

    #[test]
    fn test_joint_table_rejects_out_of_range_index() {
        let err = JointTable::new(vec![(JointName::RightElbow, [6, 8, 40])]).unwrap_err();
        assert!(matches!(err, Error::KeypointTable { index: 40, .. }));
    }

    #[test]
    fn test_custom_table() {
        let table = JointTable::new(vec![(JointName::RightElbow, [6, 8, 10])]).unwrap();
        let angles = compute_joint_angles_with(&table, &standing_frame());
        assert_eq!(angles.len(), 1);
    }

    #[test]
    fn test_joint_distances() {
        let distances = compute_joint_distances(&standing_frame());
        assert!((distances.get(DistanceMetric::ShoulderWidth).unwrap() - 20.0).abs() < 1e-9);
        assert!((distances.get(DistanceMetric::HipWidth).unwrap() - 16.0).abs() < 1e-9);
        assert!((distances.get(DistanceMetric::SpineLength).unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_distances_gated_by_validity() {
        let frame = standing_frame().with(Keypoint::LeftHip, 0.0, 0.0);
        let distances = compute_joint_distances(&frame);
        assert!(distances.get(DistanceMetric::ShoulderWidth).is_some());
        assert!(distances.get(DistanceMetric::HipWidth).is_none());
        assert!(distances.get(DistanceMetric::SpineLength).is_none());
    }

    #[test]
    fn test_joint_name_parsing() {
        assert_eq!("spine angle".parse::<JointName>().unwrap(), JointName::SpineAngle);
        assert_eq!(JointName::RightShoulderFlexion.to_string(), "Right Shoulder Flexion");
        assert!("Neck".parse::<JointName>().is_err());
    }

    #[test]
    fn test_angle_set_serializes_with_labels() {
        let angles = JointAngleSet::new().with(JointName::LeftKnee, 90.0);
        let json = serde_json::to_string(&angles).unwrap();
        assert_eq!(json, r#"{"Left Knee":90.0}"#);
    }
}
