//! Squat form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

pub struct SquatStrategy {
    policy: MissingJointPolicy,
}

impl SquatStrategy {
    pub const KNEE_TARGET: f64 = 90.0;
    pub const KNEE_BUFFER: f64 = 10.0;
    pub const HIP_TARGET: f64 = 90.0;
    pub const HIP_BUFFER: f64 = 10.0;
    pub const SPINE_TARGET: f64 = 180.0;
    pub const SPINE_BUFFER: f64 = 5.0;
    /// Below this the ankle is too stiff to reach depth
    pub const MIN_DORSIFLEXION: f64 = 10.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::Squat.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for SquatStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for SquatStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::Squat
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);
        check
            .near(
                JointName::RightKnee,
                Self::KNEE_TARGET,
                Self::KNEE_BUFFER,
                "Bend your right knee to about 90 degrees to get full depth on the squat.",
            )
            .near(
                JointName::LeftKnee,
                Self::KNEE_TARGET,
                Self::KNEE_BUFFER,
                "Bend your left knee to about 90 degrees to get full depth on the squat.",
            )
            .near(
                JointName::RightHip,
                Self::HIP_TARGET,
                Self::HIP_BUFFER,
                "Ensure your right hip bends to about 90 degrees during the squat.",
            )
            .near(
                JointName::LeftHip,
                Self::HIP_TARGET,
                Self::HIP_BUFFER,
                "Ensure your left hip bends to about 90 degrees during the squat.",
            )
            .near(
                JointName::SpineAngle,
                Self::SPINE_TARGET,
                Self::SPINE_BUFFER,
                "Keep your back straight during the squat.",
            )
            .at_least(
                JointName::RightAnkleDorsiflexion,
                Self::MIN_DORSIFLEXION,
                "Improve ankle mobility for a better squat depth (Right).",
            )
            .at_least(
                JointName::LeftAnkleDorsiflexion,
                Self::MIN_DORSIFLEXION,
                "Improve ankle mobility for a better squat depth (Left).",
            );
        check.finish()
    }
}
