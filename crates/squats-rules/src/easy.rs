//! Permissive baseline exercise.

use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;
use crate::strategy::{ExerciseStrategy, FormCheck, MissingJointPolicy, Violation};

pub struct EasyExerciseStrategy {
    policy: MissingJointPolicy,
}

impl EasyExerciseStrategy {
    pub const MIN_ELBOW: f64 = 90.0;

    pub fn new() -> Self {
        Self::with_policy(Exercise::Easy.default_missing_joint_policy())
    }

    pub fn with_policy(policy: MissingJointPolicy) -> Self {
        Self { policy }
    }
}

impl Default for EasyExerciseStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseStrategy for EasyExerciseStrategy {
    fn exercise(&self) -> Exercise {
        Exercise::Easy
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy {
        self.policy
    }

    fn check_form(&self, angles: &JointAngleSet, _distances: &JointDistanceSet) -> Vec<Violation> {
        let mut check = FormCheck::new(angles, self.policy);
        check
            .at_least(
                JointName::RightElbow,
                Self::MIN_ELBOW,
                "Check your right arm, angle is less than 90 degrees.",
            )
            .at_least(
                JointName::LeftElbow,
                Self::MIN_ELBOW,
                "Check your left arm, angle is less than 90 degrees.",
            );
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bent_arm() {
        let angles = JointAngleSet::new()
            .with(JointName::RightElbow, 45.0)
            .with(JointName::LeftElbow, 90.0);
        let violations = EasyExerciseStrategy::new().check_form(&angles, &JointDistanceSet::new());
        assert_eq!(violations, vec!["Check your right arm, angle is less than 90 degrees.".to_string()]);
    }

    #[test]
    fn test_nothing_detected_is_silent() {
        assert!(EasyExerciseStrategy::new()
            .check_form(&JointAngleSet::new(), &JointDistanceSet::new())
            .is_empty());
    }
}
