//! JSON export of per-joint angle series.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use squats_core::{JointName, Result};
use squats_session::PlotSink;

/// Collects every joint series and writes them as one JSON object keyed by
/// joint label
#[derive(Debug, Default)]
pub struct JsonPlotSink {
    series: BTreeMap<JointName, Vec<Option<f64>>>,
}

impl JsonPlotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.series)?;
        fs::write(path, text)?;
        Ok(())
    }
}

impl PlotSink for JsonPlotSink {
    fn plot(&mut self, series: &[Option<f64>], joint: JointName) -> Result<()> {
        self.series.insert(joint, series.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angles.json");

        let mut sink = JsonPlotSink::new();
        sink.plot(&[Some(90.0), None], JointName::LeftKnee).unwrap();
        sink.plot(&[Some(170.5)], JointName::SpineAngle).unwrap();
        assert_eq!(sink.len(), 2);
        sink.write(&path).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["Left Knee"], serde_json::json!([90.0, null]));
        assert_eq!(written["Spine Angle"], serde_json::json!([170.5]));
    }
}
