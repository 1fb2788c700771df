//! Per-joint angle history for the session plots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squats_core::{JointAngleSet, JointName};

/// One entry per measured frame for every joint; `None` where the joint
/// could not be measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSeries {
    series: BTreeMap<JointName, Vec<Option<f64>>>,
}

impl AngleSeries {
    pub fn new() -> Self {
        Self {
            series: JointName::ALL.into_iter().map(|joint| (joint, Vec::new())).collect(),
        }
    }

    /// Append one frame, keeping all joints the same length
    pub fn record(&mut self, angles: &JointAngleSet) {
        for joint in JointName::ALL {
            self.series.entry(joint).or_default().push(angles.get(joint));
        }
    }

    pub fn get(&self, joint: JointName) -> &[Option<f64>] {
        self.series.get(&joint).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, &[Option<f64>])> + '_ {
        self.series.iter().map(|(joint, values)| (*joint, values.as_slice()))
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.get(JointName::RightElbow).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.series.values_mut().for_each(Vec::clear);
    }
}

impl Default for AngleSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_joints_aligned() {
        let mut series = AngleSeries::new();
        series.record(&JointAngleSet::new().with(JointName::LeftKnee, 95.0));
        series.record(&JointAngleSet::new().with(JointName::RightElbow, 170.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(JointName::LeftKnee), &[Some(95.0), None]);
        assert_eq!(series.get(JointName::RightElbow), &[None, Some(170.0)]);
        assert!(series.iter().all(|(_, values)| values.len() == 2));
        assert_eq!(series.iter().count(), JointName::COUNT);
    }

    #[test]
    fn test_clear() {
        let mut series = AngleSeries::new();
        series.record(&JointAngleSet::new());
        series.clear();
        assert!(series.is_empty());
        assert_eq!(series.iter().count(), JointName::COUNT);
    }
}
