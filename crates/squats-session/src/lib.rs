//! # Squats-Session
//!
//! Session orchestration for exercise form feedback.
//!
//! ## Per-Frame Flow
//!
//! 1. **Pose**: keypoints from an external [`PoseEstimator`]
//! 2. **Measure**: joint angles and body distances
//! 3. **Evaluate**: on a bounded cadence the exercise strategy checks form
//! 4. **Select**: the [`FeedbackManager`] holds a message through its
//!    cooldown, then surfaces the most urgent active violation
//! 5. **Emit**: the chosen message goes to a [`FeedbackSink`]
//!
//! At end of stream each joint's angle series goes to a [`PlotSink`] and a
//! [`SessionReport`] summarizes the session.

pub mod audio;
pub mod config;
pub mod feedback;
pub mod pipeline;
pub mod series;
pub mod sinks;

pub use audio::*;
pub use config::*;
pub use feedback::*;
pub use pipeline::*;
pub use series::*;
pub use sinks::*;
