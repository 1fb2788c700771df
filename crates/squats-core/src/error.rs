//! Error types for the squats form-evaluation system.
//!
//! Missing keypoints and degenerate geometry are not errors: they are encoded
//! as absent entries in the angle and distance sets.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported exercise: {name}")]
    UnsupportedExercise { name: String },

    #[error("Joint table references keypoint {index} but frame holds {len} slots")]
    KeypointTable { index: usize, len: usize },

    #[error("Pose estimation error: {0}")]
    PoseEstimation(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
