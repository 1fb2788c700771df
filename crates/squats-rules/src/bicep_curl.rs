//! Bicep curl form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

/// Elbow travels between full extension and a tight curl while the
/// shoulders and spine stay still.
pub struct BicepCurlStrategy {
    policy: MissingJointPolicy,
}

impl BicepCurlStrategy {
    pub const ELBOW_BUFFER: f64 = 20.0;
    pub const EXTENDED_ELBOW: f64 = 180.0;
    pub const CURLED_ELBOW: f64 = 30.0;
    pub const SHOULDER_TARGET: f64 = 0.0;
    pub const SHOULDER_BUFFER: f64 = 40.0;
    pub const SPINE_TARGET: f64 = 0.0;
    pub const SPINE_BUFFER: f64 = 10.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::BicepCurl.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }

    fn check_elbow(check: &mut FormCheck<'_>, joint: JointName, side: &str) {
        let Some(angle) = check.measure(joint) else {
            return;
        };
        if angle > Self::EXTENDED_ELBOW - Self::ELBOW_BUFFER {
            check.push(format!("Fully extend your {side} arm at the bottom of the curl."));
        } else if angle < Self::CURLED_ELBOW + Self::ELBOW_BUFFER {
            check.push(format!("Curl your {side} arm up to about 30 degrees."));
        }
    }
}

impl Default for BicepCurlStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for BicepCurlStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::BicepCurl
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);

        Self::check_elbow(&mut check, JointName::RightElbow, "right");
        Self::check_elbow(&mut check, JointName::LeftElbow, "left");

        check
            .near(
                JointName::RightShoulderFlexion,
                Self::SHOULDER_TARGET,
                Self::SHOULDER_BUFFER,
                "Avoid swinging your right shoulder during the curl.",
            )
            .near(
                JointName::LeftShoulderFlexion,
                Self::SHOULDER_TARGET,
                Self::SHOULDER_BUFFER,
                "Avoid swinging your left shoulder during the curl.",
            )
            .near(
                JointName::SpineAngle,
                Self::SPINE_TARGET,
                Self::SPINE_BUFFER,
                "Keep your spine straight, avoid bending forward or backward during the curl.",
            );
        check.finish()
    }
}
