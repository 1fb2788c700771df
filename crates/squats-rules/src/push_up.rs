//! Push-up form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

/// Elbows near 90° at the bottom, body held in a straight line
pub struct PushUpStrategy {
    policy: MissingJointPolicy,
}

impl PushUpStrategy {
    pub const ELBOW_TARGET: f64 = 90.0;
    pub const ELBOW_BUFFER: f64 = 10.0;
    pub const SPINE_TARGET: f64 = 180.0;
    pub const SPINE_BUFFER: f64 = 5.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::PushUp.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for PushUpStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for PushUpStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::PushUp
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
                "Try to bend your right elbow to about 90 degrees at the bottom of the push-up.",
            )
            .near(
                JointName::LeftElbow,
                Self::ELBOW_TARGET,
                Self::ELBOW_BUFFER,
                "Try to bend your left elbow to about 90 degrees at the bottom of the push-up.",
            )
            .near(
                JointName::SpineAngle,
                Self::SPINE_TARGET,
                Self::SPINE_BUFFER,
                "Keep your back straight during the push-up.",
            );
        check.finish()
    }
}
