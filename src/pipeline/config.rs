use crate::camera::Projection;
use crate::keypoints::KptMatchesClusterConf;
use crate::lidar::LidarRoi;
use crate::ttc::{LidarTtcMethod, DEFAULT_MIN_CAMERA_DISTANCE};
use crate::Errors;
use anyhow::Result;

/// Sensor frame rate of the reference recordings, frames per second
pub const DEFAULT_FRAME_RATE: f64 = 10.0;

/// Share of the bounding box roi cut off before the Lidar points are assigned to the box
pub const DEFAULT_SHRINK_FACTOR: f32 = 0.10;

/// Parameters of the fusion cycle
///
/// The defaults reproduce the reference setup: 10 fps, shrink factor `0.10`, median Lidar distance,
/// `Stdev(2.0)` keypoint match filtering, 100 px minimal keypoint distance, no Lidar cropping and the
/// KITTI calibration.
///
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    pub frame_rate: f64,
    pub shrink_factor: f32,
    pub lidar_method: LidarTtcMethod,
    pub cluster: KptMatchesClusterConf,
    pub min_camera_distance: f64,
    /// Minimal amount of keypoint votes required to associate two boxes
    pub min_votes: usize,
    pub lidar_roi: Option<LidarRoi>,
    pub projection: Projection,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            lidar_method: LidarTtcMethod::default(),
            cluster: KptMatchesClusterConf::default(),
            min_camera_distance: DEFAULT_MIN_CAMERA_DISTANCE,
            min_votes: 1,
            lidar_roi: None,
            projection: Projection::default(),
        }
    }
}

impl FusionConfig {
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_shrink_factor(mut self, shrink_factor: f32) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    pub fn with_lidar_method(mut self, method: LidarTtcMethod) -> Self {
        self.lidar_method = method;
        self
    }

    pub fn with_cluster(mut self, cluster: KptMatchesClusterConf) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn with_min_camera_distance(mut self, distance: f64) -> Self {
        self.min_camera_distance = distance;
        self
    }

    pub fn with_min_votes(mut self, min_votes: usize) -> Self {
        self.min_votes = min_votes;
        self
    }

    /// Crops the Lidar points of every frame to the roi before they are clustered
    ///
    pub fn with_lidar_roi(mut self, roi: LidarRoi) -> Self {
        self.lidar_roi = Some(roi);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Checks the frame rate and the shrink factor
    ///
    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(Errors::InvalidFrameRate(self.frame_rate).into());
        }
        if !(0.0..1.0).contains(&self.shrink_factor) {
            return Err(Errors::InvalidShrinkFactor(self.shrink_factor).into());
        }
        Ok(())
    }
}
