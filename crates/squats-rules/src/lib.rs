//! # Squats-Rules
//!
//! Exercise-specific form rules operating on joint measurements.
//!
//! ## Strategies
//!
//! Each supported exercise has its own [`ExerciseStrategy`] holding target
//! angles, tolerance buffers and a missing-joint policy:
//!
//! - **Band rules**: angle must stay within `target ± buffer`
//! - **Threshold rules**: angle must stay above (or strictly exceed) a limit
//! - **Missing joints**: reported as "<joint> not detected." or skipped,
//!   per exercise, overridable through configuration
//!
//! Strategies are stateless; ordering and de-duplication of their output is
//! left to the feedback layer.

pub mod bench_press;
pub mod bicep_curl;
pub mod easy;
pub mod exercise;
pub mod lunge;
pub mod overhead_press;
pub mod pull_up;
pub mod push_up;
pub mod reference;
pub mod squat;
pub mod strategy;

pub use bench_press::*;
pub use bicep_curl::*;
pub use easy::*;
pub use exercise::*;
pub use lunge::*;
pub use overhead_press::*;
pub use pull_up::*;
pub use push_up::*;
pub use reference::*;
pub use squat::*;
pub use strategy::*;
