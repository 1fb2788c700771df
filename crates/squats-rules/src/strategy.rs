//! Base strategy trait and the rule-check helper shared by all exercises.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use squats_core::{JointAngleSet, JointDistanceSet, JointName};

use crate::exercise::Exercise;

/// A single rule-check failure, phrased for the user
pub type Violation = String;

/// What a strategy does when a joint it checks was not measured this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingJointPolicy {
    /// Emit "<joint> not detected." as a violation
    Report,
    /// Skip the rule silently
    Skip,
}

/// Exercise-specific rule set mapping joint measurements to violations
pub trait ExerciseStrategy: Send + Sync {
    /// Exercise this strategy evaluates
    fn exercise(&self) -> Exercise;

    /// Canonical exercise name
    fn name(&self) -> &'static str {
        self.exercise().name()
    }

    fn missing_joint_policy(&self) -> MissingJointPolicy;

    /// Evaluate one frame's measurements. No ordering of the returned
    /// violations is implied.
    fn check_form(&self, angles: &JointAngleSet, distances: &JointDistanceSet) -> Vec<Violation>;
}

/// Message used when a checked joint is absent and the policy is `Report`
pub fn not_detected_message(joint: JointName) -> String {
    let subject = match joint {
        JointName::RightShoulderFlexion => "Right shoulder",
        JointName::LeftShoulderFlexion => "Left shoulder",
        JointName::RightAnkleDorsiflexion => "Right ankle",
        JointName::LeftAnkleDorsiflexion => "Left ankle",
        JointName::RightElbow => "Right elbow",
        JointName::LeftElbow => "Left elbow",
        JointName::RightKnee => "Right knee",
        JointName::LeftKnee => "Left knee",
        JointName::RightHip => "Right hip",
        JointName::LeftHip => "Left hip",
        JointName::SpineAngle => "Spine angle",
    };
    format!("{subject} not detected.")
}

/// Accumulates violations for one evaluation.
///
/// Every rule first looks its joint up; an absent joint is reported at
/// most once per evaluation under [`MissingJointPolicy::Report`].
pub struct FormCheck<'a> {
    angles: &'a JointAngleSet,
    policy: MissingJointPolicy,
    missing: BTreeSet<JointName>,
    violations: Vec<Violation>,
}

impl<'a> FormCheck<'a> {
    pub fn new(angles: &'a JointAngleSet, policy: MissingJointPolicy) -> Self {
        Self {
            angles,
            policy,
            missing: BTreeSet::new(),
            violations: Vec::new(),
        }
    }

    /// Look up a joint, applying the missing-joint policy when absent
    pub fn measure(&mut self, joint: JointName) -> Option<f64> {
        let angle = self.angles.get(joint);
        if angle.is_none() && self.policy == MissingJointPolicy::Report && self.missing.insert(joint) {
            self.violations.push(not_detected_message(joint));
        }
        angle
    }

    pub fn push(&mut self, message: impl Into<String>) -> &mut Self {
        self.violations.push(message.into());
        self
    }

    /// Violation when the angle deviates from `target` by more than `buffer`
    pub fn near(&mut self, joint: JointName, target: f64, buffer: f64, message: &str) -> &mut Self {
        if let Some(angle) = self.measure(joint) {
            if (angle - target).abs() > buffer {
                self.push(message);
            }
        }
        self
    }

    /// Violation when the angle falls outside `[low, high]`
    pub fn within(&mut self, joint: JointName, low: f64, high: f64, message: &str) -> &mut Self {
        if let Some(angle) = self.measure(joint) {
            if angle < low || angle > high {
                self.push(message);
            }
        }
        self
    }

    /// Violation when the angle is below `min`
    pub fn at_least(&mut self, joint: JointName, min: f64, message: &str) -> &mut Self {
        if let Some(angle) = self.measure(joint) {
            if angle < min {
                self.push(message);
            }
        }
        self
    }

    /// Violation unless the angle is strictly greater than `threshold`
    pub fn exceeds(&mut self, joint: JointName, threshold: f64, message: &str) -> &mut Self {
        if let Some(angle) = self.measure(joint) {
            if angle <= threshold {
                self.push(message);
            }
        }
        self
    }

    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }
}
