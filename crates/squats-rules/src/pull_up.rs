//! Pull-up form rules.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

/// Full extension at the bottom, engaged shoulders at the top.
///
/// Both rules are one-sided thresholds rather than target bands.
pub struct PullUpStrategy {
    policy: MissingJointPolicy,
}

impl PullUpStrategy {
    /// Elbows must exceed this to count as fully extended
    pub const ELBOW_EXTENSION: f64 = 160.0;
    pub const MIN_SHOULDER_FLEXION: f64 = 45.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::PullUp.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for PullUpStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for PullUpStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::PullUp
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);
        check
            .exceeds(
                JointName::RightElbow,
                Self::ELBOW_EXTENSION,
                "Ensure your right elbow is fully extended at the bottom of the pull-up.",
            )
            .exceeds(
                JointName::LeftElbow,
                Self::ELBOW_EXTENSION,
                "Ensure your left elbow is fully extended at the bottom of the pull-up.",
            )
            .at_least(
                JointName::RightShoulderFlexion,
                Self::MIN_SHOULDER_FLEXION,
                "Ensure your right shoulder is fully engaged at the top of the pull-up.",
            )
            .at_least(
                JointName::LeftShoulderFlexion,
                Self::MIN_SHOULDER_FLEXION,
                "Ensure your left shoulder is fully engaged at the top of the pull-up.",
            );
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_elbows_pass() {
        let angles = JointAngleSet::new()
            .with(JointName::RightElbow, 172.0)
            .with(JointName::LeftElbow, 165.0)
            .with(JointName::RightShoulderFlexion, 150.0)
            .with(JointName::LeftShoulderFlexion, 150.0);

        assert!(PullUpStrategy::new()
            .check_form(&angles, &JointDistanceSet::new())
            .is_empty());
    }

    #[test]
    fn test_bent_elbow_and_disengaged_shoulder() {
        let angles = JointAngleSet::new()
            .with(JointName::RightElbow, 120.0)
            .with(JointName::LeftElbow, 170.0)
            .with(JointName::LeftShoulderFlexion, 30.0);

        let violations = PullUpStrategy::new().check_form(&angles, &JointDistanceSet::new());
        assert_eq!(
            violations,
            vec![
                "Ensure your right elbow is fully extended at the bottom of the pull-up.".to_string(),
                "Ensure your left shoulder is fully engaged at the top of the pull-up.".to_string(),
            ]
        );
    }
}
