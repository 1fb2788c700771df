//! # Squats-Core
//!
//! Core types and measurements for evaluating exercise form from 2D
//! skeleton keypoints produced by an external pose-estimation model.
//!
//! ## Measurement Flow
//!
//! 1. **Validation**: a keypoint is usable unless absent or at the origin
//! 2. **Angles**: eleven named joint angles, each from a fixed keypoint triple
//! 3. **Distances**: shoulder width, hip width and spine length
//!
//! Measurements that cannot be taken are left out of the result sets rather
//! than reported as zero.

pub mod error;
pub mod geometry;
pub mod joints;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use joints::*;
pub use types::*;
