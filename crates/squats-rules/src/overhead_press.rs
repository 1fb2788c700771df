//! Overhead press form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

/// Lockout at the top: elbows straight, arms overhead, neutral spine
pub struct OverheadPressStrategy {
    policy: MissingJointPolicy,
}

impl OverheadPressStrategy {
    pub const ELBOW_TARGET: f64 = 180.0;
    pub const ELBOW_BUFFER: f64 = 20.0;
    pub const SHOULDER_TARGET: f64 = 180.0;
    pub const SHOULDER_BUFFER: f64 = 20.0;
    pub const SPINE_TARGET: f64 = 180.0;
    pub const SPINE_BUFFER: f64 = 30.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::OverheadPress.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for OverheadPressStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for OverheadPressStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::OverheadPress
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);
        check
            .near(
                JointName::RightElbow,
                Self::ELBOW_TARGET,
                Self::ELBOW_BUFFER,
                "Fully extend your right elbow at the top of the press.",
            )
            .near(
                JointName::LeftElbow,
                Self::ELBOW_TARGET,
                Self::ELBOW_BUFFER,
                "Fully extend your left elbow at the top of the press.",
            )
            .near(
                JointName::RightShoulderFlexion,
                Self::SHOULDER_TARGET,
                Self::SHOULDER_BUFFER,
                "Lift your right arm fully overhead.",
            )
            .near(
                JointName::LeftShoulderFlexion,
                Self::SHOULDER_TARGET,
                Self::SHOULDER_BUFFER,
                "Lift your left arm fully overhead.",
            )
            .near(
                JointName::SpineAngle,
                Self::SPINE_TARGET,
                Self::SPINE_BUFFER,
                "Keep your back straight and avoid arching during the press.",
            );
        check.finish()
    }
}
