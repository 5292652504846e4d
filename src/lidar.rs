use crate::frame::LidarPoint;
use crate::utils::stats::{mean, median, min_max};
use log::debug;

/// Assignment of Lidar points to camera bounding boxes
///
pub mod clustering;

/// Box in the Lidar coordinates, used to keep only the points of interest
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarRoi {
    pub min_x: f64,
    pub max_x: f64,
    /// Lateral bound, the points with `|y| <= max_y` are kept
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub min_reflectivity: f64,
}

impl LidarRoi {
    /// The ego-lane in front of the vehicle
    ///
    pub fn ego_lane() -> Self {
        Self {
            min_x: 2.0,
            max_x: 20.0,
            max_y: 2.0,
            min_z: -1.5,
            max_z: -0.9,
            min_reflectivity: 0.1,
        }
    }

    /// Points above the sensor plane (`z > 0`) are never accepted
    ///
    pub fn contains(&self, p: &LidarPoint) -> bool {
        p.x >= self.min_x
            && p.x <= self.max_x
            && p.z >= self.min_z
            && p.z <= self.max_z
            && p.z <= 0.0
            && p.y.abs() <= self.max_y
            && p.r >= self.min_reflectivity
    }
}

/// Removes the points that fall outside of the roi
///
pub fn crop_lidar_points(points: &mut Vec<LidarPoint>, roi: &LidarRoi) {
    let before = points.len();
    points.retain(|p| roi.contains(p));
    debug!(
        "Lidar points cropped: {} of {} points kept",
        points.len(),
        before
    );
}

/// Forward (`x`) coordinates of the points
///
pub fn extract_x_component(points: &[LidarPoint]) -> Vec<f64> {
    points.iter().map(|p| p.x).collect()
}

pub fn median_x(points: &[LidarPoint]) -> f64 {
    median(&extract_x_component(points))
}

pub fn mean_x(points: &[LidarPoint]) -> f64 {
    mean(&extract_x_component(points))
}

/// Top-view statistics of a Lidar point cluster
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarSummary {
    pub points: usize,
    /// The closest point in the forward direction
    pub x_min: f64,
    /// Lateral extent of the cluster, `y_max - y_min`
    pub y_width: f64,
    pub median_x: f64,
}

/// Summarizes the cluster, `None` when there are no points
///
pub fn summarize(points: &[LidarPoint]) -> Option<LidarSummary> {
    let xs = extract_x_component(points);
    let (x_min, _) = min_max(&xs)?;
    let (y_min, y_max) = min_max(&points.iter().map(|p| p.y).collect::<Vec<_>>())?;
    Some(LidarSummary {
        points: points.len(),
        x_min,
        y_width: y_max - y_min,
        median_x: median(&xs),
    })
}
