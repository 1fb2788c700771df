//! Bench press form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

pub struct BenchPressStrategy {
    policy: MissingJointPolicy,
}

impl BenchPressStrategy {
    pub const ELBOW_MIN: f64 = 70.0;
    pub const ELBOW_MAX: f64 = 90.0;
    pub const MIN_SHOULDER_FLEXION: f64 = 45.0;
    /// Largest left/right shoulder flexion difference for an even press
    pub const MAX_SHOULDER_ASYMMETRY: f64 = 10.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::BenchPress.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for BenchPressStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for BenchPressStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::BenchPress
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);
        check
            .within(
                JointName::RightElbow,
                Self::ELBOW_MIN,
                Self::ELBOW_MAX,
                "Keep your right elbow between 70 and 90 degrees for proper form.",
            )
            .within(
                JointName::LeftElbow,
                Self::ELBOW_MIN,
                Self::ELBOW_MAX,
                "Keep your left elbow between 70 and 90 degrees for proper form.",
            )
            .at_least(
                JointName::RightShoulderFlexion,
                Self::MIN_SHOULDER_FLEXION,
                "Ensure proper shoulder engagement on the right side.",
            )
            .at_least(
                JointName::LeftShoulderFlexion,
                Self::MIN_SHOULDER_FLEXION,
                "Ensure proper shoulder engagement on the left side.",
            );

        let right = check.measure(JointName::RightShoulderFlexion);
        let left = check.measure(JointName::LeftShoulderFlexion);
        if let (Some(right), Some(left)) = (right, left) {
            if (right - left).abs() > Self::MAX_SHOULDER_ASYMMETRY {
                check.push("Shoulders are uneven. Try to balance the bar for an even press.");
            }
        }

        check.finish()
    }
}
