//! Recorded pose source.
//!
//! One frame per line, each a JSON array of keypoint slots in pose-model
//! order. A slot is `[x, y]`, `[x, y, confidence]` or `null`. An empty
//! array or a bare `null` means no person was found in that frame.

use std::fs;
use std::path::Path;

use squats_core::{Error, KeypointFrame, Position2D, Result};
use squats_session::PoseEstimator;

/// Non-blank lines of a recording
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse one recorded frame
pub fn parse_line(line: &str) -> Result<Option<KeypointFrame>> {
    let slots: Option<Vec<Option<Vec<f64>>>> = serde_json::from_str(line)
        .map_err(|e| Error::PoseEstimation(format!("malformed frame: {e}")))?;

    let Some(slots) = slots.filter(|slots| !slots.is_empty()) else {
        return Ok(None);
    };

    let slots = slots
        .into_iter()
        .map(|slot| match slot.as_deref() {
            None => Ok(None),
            Some([x, y]) => Ok(Some((Position2D::new(*x, *y), None))),
            Some([x, y, confidence]) => Ok(Some((Position2D::new(*x, *y), Some(*confidence as f32)))),
            Some(other) => Err(Error::PoseEstimation(format!(
                "keypoint slot has {} values, expected 2 or 3",
                other.len()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(KeypointFrame::from_slots(slots)))
}

/// Pose estimator that reads frames from recorded JSON lines
#[derive(Debug, Default)]
pub struct RecordedPoses;

impl PoseEstimator for RecordedPoses {
    type Image = String;

    fn keypoints(&mut self, image: &String) -> Result<Option<KeypointFrame>> {
        parse_line(image)
    }
}

/// Parse a whole recording for reference comparison; frames without a
/// person become empty frames so indices stay aligned
pub fn load_frames(path: &Path) -> Result<Vec<KeypointFrame>> {
    read_lines(path)?
        .iter()
        .map(|line| parse_line(line).map(Option::unwrap_or_default))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use squats_core::Keypoint;

    #[test]
    fn test_parse_frame() {
        let frame = parse_line("[[0.5, 0.25], null, [1.0, 2.0, 0.9]]").unwrap().unwrap();

        let nose = frame.get(Keypoint::Nose).unwrap();
        assert_eq!(nose.position, Position2D::new(0.5, 0.25));
        assert_eq!(nose.confidence, None);
        assert!(frame.get(Keypoint::LeftEye).is_none());
        assert_eq!(frame.get(Keypoint::RightEye).unwrap().confidence, Some(0.9));
        assert_eq!(frame.detected_count(), 2);
    }

    #[test]
    fn test_no_person() {
        assert!(parse_line("null").unwrap().is_none());
        assert!(parse_line("[]").unwrap().is_none());
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(parse_line("[[1.0]"), Err(Error::PoseEstimation(_))));
        assert!(matches!(parse_line("[[1.0]]"), Err(Error::PoseEstimation(_))));
        assert!(matches!(parse_line("{\"x\": 1}"), Err(Error::PoseEstimation(_))));
    }

    #[test]
    fn test_load_frames_keeps_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempt.jsonl");
        fs::write(&path, "[[1.0, 1.0]]\n\nnull\n[[2.0, 2.0]]\n").unwrap();

        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].is_empty());
        assert_eq!(frames[2].get(Keypoint::Nose).unwrap().position.x, 2.0);
    }
}
