//! Lunge form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

pub struct LungeStrategy {
    policy: MissingJointPolicy,
}

impl LungeStrategy {
    pub const KNEE_TARGET: f64 = 90.0;
    pub const KNEE_BUFFER: f64 = 10.0;
    /// Knee angles below this put the knee past the toes
    pub const KNEE_OVER_TOES: f64 = 85.0;
    pub const SPINE_TARGET: f64 = 180.0;
    pub const SPINE_BUFFER: f64 = 10.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::Lunge.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for LungeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for LungeStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::Lunge
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
                "Bend your right knee to about 90 degrees in the lunge.",
            )
            .near(
                JointName::LeftKnee,
                Self::KNEE_TARGET,
                Self::KNEE_BUFFER,
                "Bend your left knee to about 90 degrees in the lunge.",
            )
            .at_least(
                JointName::RightKnee,
                Self::KNEE_OVER_TOES,
                "Avoid pushing your right knee too far over your toes.",
            )
            .at_least(
                JointName::LeftKnee,
                Self::KNEE_OVER_TOES,
                "Avoid pushing your left knee too far over your toes.",
            )
            .near(
                JointName::SpineAngle,
                Self::SPINE_TARGET,
                Self::SPINE_BUFFER,
                "Keep your upper body straight during the lunge.",
            );
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knee_past_toes_fires_both_rules() {
        let angles = JointAngleSet::new()
            .with(JointName::RightKnee, 70.0)
            .with(JointName::LeftKnee, 88.0)
            .with(JointName::SpineAngle, 175.0);

        let violations = LungeStrategy::new().check_form(&angles, &JointDistanceSet::new());
        assert_eq!(
            violations,
            vec![
                "Bend your right knee to about 90 degrees in the lunge.".to_string(),
                "Avoid pushing your right knee too far over your toes.".to_string(),
            ]
        );
    }

    #[test]
    fn test_knee_within_band_but_over_toes() {
        let angles = JointAngleSet::new()
            .with(JointName::RightKnee, 82.0)
            .with(JointName::LeftKnee, 90.0)
            .with(JointName::SpineAngle, 180.0);

        let violations = LungeStrategy::new().check_form(&angles, &JointDistanceSet::new());
        assert_eq!(violations, vec!["Avoid pushing your right knee too far over your toes.".to_string()]);
    }

    #[test]
    fn test_missing_joints_reported_once_each() {
        let violations = LungeStrategy::new().check_form(&JointAngleSet::new(), &JointDistanceSet::new());
        assert_eq!(
            violations,
            vec![
                "Right knee not detected.".to_string(),
                "Left knee not detected.".to_string(),
                "Spine angle not detected.".to_string(),
            ]
        );
    }
}
