/// Bounding box association between consecutive frames
pub mod association;
/// Lidar to camera projection
pub mod camera;
/// Synthetic scenes for tests and benchmarks
pub mod examples;
/// Per-cycle sensor data
pub mod frame;
/// Keypoint match clustering
pub mod keypoints;
/// Lidar point cloud processing
pub mod lidar;
/// Fusion cycle driver
pub mod pipeline;
pub mod prelude;
/// Time-to-collision estimation
pub mod ttc;
/// Geometry and statistics helpers
pub mod utils;

#[cfg(feature = "python")]
pub mod py;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Errors {
    #[error("Previous and current frames require 2 frames in the buffer, {resident} resident.")]
    EmptyBuffer { resident: usize },
    #[error("Bounding box {0} is missing in the frame.")]
    MissingBoundingBox(u32),
    #[error("Keypoint index {index} is out of range, the frame has {len} keypoints.")]
    KeypointOutOfRange { index: usize, len: usize },
    #[error("Frame rate must be finite and positive, {0} given.")]
    InvalidFrameRate(f64),
    #[error("Shrink factor must be in [0, 1), {0} given.")]
    InvalidShrinkFactor(f32),
}

/// Approximate equality of geometric values
///
pub trait EstimateClose {
    fn almost_same(&self, other: &Self, eps: f32) -> bool;
}

#[allow(dead_code)]
pub(crate) const EPS: f32 = 0.00001;
pub(crate) const EPS_F64: f64 = 1e-9;
