use crate::frame::{Keypoint, KeypointMatch, LidarPoint};
use crate::lidar::extract_x_component;
use crate::utils::stats::{mean, median};
use anyhow::Result;
use itertools::Itertools;
use log::{debug, warn};

/// Minimal pixel distance between two current keypoints for the pair to participate in the camera TTC
pub const DEFAULT_MIN_CAMERA_DISTANCE: f64 = 100.0;

/// How the distance to the object is estimated from its Lidar points
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LidarTtcMethod {
    /// Median of the forward coordinates
    #[default]
    Median,
    /// Mean of the forward coordinates
    Mean,
    /// Euclidean clustering of the points, not implemented: always estimates `0.0`
    ClusterEuclid,
}

/// Time-to-collision estimates for an associated box pair, seconds
///
/// The estimates are not sanitized: a stationary or receding object yields an infinite, NaN or
/// negative value. Use [TtcResult::is_actionable] before acting on them.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtcResult {
    pub lidar: f64,
    pub camera: f64,
}

impl TtcResult {
    /// The estimate is finite and positive
    ///
    pub fn is_actionable(ttc: f64) -> bool {
        ttc.is_finite() && ttc > 0.0
    }

    pub fn lidar_actionable(&self) -> bool {
        Self::is_actionable(self.lidar)
    }

    pub fn camera_actionable(&self) -> bool {
        Self::is_actionable(self.camera)
    }
}

/// Constant-velocity model: `d_curr * dt / (d_prev - d_curr)` where `dt = 1 / frame_rate`
///
pub fn ttc_from_distances(d_prev: f64, d_curr: f64, frame_rate: f64) -> f64 {
    d_curr / (frame_rate * (d_prev - d_curr))
}

/// Lidar based time-to-collision
///
/// # Parameters
/// * `method` - distance estimation method
/// * `prev`, `curr` - Lidar points of the object in the previous and the current frames
/// * `frame_rate` - frames per second
///
pub fn compute_ttc_lidar(
    method: LidarTtcMethod,
    prev: &[LidarPoint],
    curr: &[LidarPoint],
    frame_rate: f64,
) -> f64 {
    let (x_prev, x_curr) = (extract_x_component(prev), extract_x_component(curr));
    let (d_prev, d_curr) = match method {
        LidarTtcMethod::Median => (median(&x_prev), median(&x_curr)),
        LidarTtcMethod::Mean => (mean(&x_prev), mean(&x_curr)),
        LidarTtcMethod::ClusterEuclid => {
            warn!("Cluster based Lidar TTC computation is not implemented");
            return 0.0;
        }
    };
    debug!(
        "Lidar TTC: estimated distance to the object {}, distance change (d0 - d1) {}",
        d_curr,
        d_prev - d_curr
    );
    ttc_from_distances(d_prev, d_curr, frame_rate)
}

/// Camera based time-to-collision from the keypoint matches of the object
///
/// For every pair of matches the distance between the current keypoints is divided by the distance
/// between the previous keypoints. Pairs with the previous distance close to zero or with the current
/// distance below `min_distance` are skipped. The median ratio `r` gives `dt / (r - 1)`.
///
/// Returns `NaN` when no pair survives.
///
pub fn compute_ttc_camera(
    prev_kpts: &[Keypoint],
    curr_kpts: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    frame_rate: f64,
    min_distance: f64,
) -> Result<f64> {
    let resolved = kpt_matches
        .iter()
        .map(|m| m.resolve(prev_kpts, curr_kpts))
        .collect::<Result<Vec<_>>>()?;

    let ratios = resolved
        .iter()
        .tuple_combinations()
        .filter_map(|((outer_prev, outer_curr), (inner_prev, inner_curr))| {
            let dist_curr = outer_curr.distance(inner_curr);
            let dist_prev = outer_prev.distance(inner_prev);
            if dist_prev > f64::EPSILON && dist_curr >= min_distance {
                Some(dist_curr / dist_prev)
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    if ratios.is_empty() {
        debug!(
            "Camera TTC: no keypoint pairs among {} matches, TTC cannot be estimated",
            kpt_matches.len()
        );
        return Ok(f64::NAN);
    }

    let ratio = median(&ratios);
    debug!(
        "Camera TTC: median distance ratio {} from {} keypoint pairs",
        ratio,
        ratios.len()
    );
    Ok(1.0 / (frame_rate * (ratio - 1.0)))
}
