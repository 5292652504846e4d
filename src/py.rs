use crate::frame::{Keypoint, KeypointMatch, LidarPoint};
use crate::ttc::{compute_ttc_camera, compute_ttc_lidar, ttc_from_distances, LidarTtcMethod};
use crate::utils::stats::{mean, median};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Median of the values, `0.0` for the empty list
///
#[pyfunction]
#[pyo3(name = "median", signature = (vals))]
pub fn median_py(vals: Vec<f64>) -> f64 {
    median(&vals)
}

/// Mean of the values, `0.0` for the empty list
///
#[pyfunction]
#[pyo3(name = "mean", signature = (vals))]
pub fn mean_py(vals: Vec<f64>) -> f64 {
    mean(&vals)
}

#[pyfunction]
#[pyo3(name = "ttc_from_distances", signature = (d_prev, d_curr, frame_rate))]
pub fn ttc_from_distances_py(d_prev: f64, d_curr: f64, frame_rate: f64) -> f64 {
    ttc_from_distances(d_prev, d_curr, frame_rate)
}

/// # Lidar TTC Python interface
///
/// The signature is:
/// ```python
/// def compute_ttc_lidar(prev_x: List[float], curr_x: List[float], frame_rate: float, method: str = "median") -> float
/// ```
/// # Parameters
/// * `prev_x`, `curr_x` - forward coordinates of the object points in the previous and the current frames
/// * `method` - `median`, `mean` or `cluster_euclid`
///
#[pyfunction]
#[pyo3(
    name = "compute_ttc_lidar",
    signature = (prev_x, curr_x, frame_rate, method = "median")
)]
pub fn compute_ttc_lidar_py(
    prev_x: Vec<f64>,
    curr_x: Vec<f64>,
    frame_rate: f64,
    method: &str,
) -> PyResult<f64> {
    let method = match method {
        "median" => LidarTtcMethod::Median,
        "mean" => LidarTtcMethod::Mean,
        "cluster_euclid" => LidarTtcMethod::ClusterEuclid,
        other => {
            return Err(PyValueError::new_err(format!(
                "Unknown Lidar TTC method: {other}"
            )))
        }
    };
    let to_points = |xs: Vec<f64>| {
        xs.into_iter()
            .map(|x| LidarPoint::new(x, 0.0, 0.0, 0.0))
            .collect::<Vec<_>>()
    };
    Ok(compute_ttc_lidar(
        method,
        &to_points(prev_x),
        &to_points(curr_x),
        frame_rate,
    ))
}

/// # Camera TTC Python interface
///
/// The signature is:
/// ```python
/// def compute_ttc_camera(prev_kpts: List[(float, float)], curr_kpts: List[(float, float)], matches: List[(int, int)], frame_rate: float, min_distance: float = 100.0) -> float
/// ```
/// # Parameters
/// * `prev_kpts`, `curr_kpts` - keypoint positions of the previous and the current frames
/// * `matches` - `(previous index, current index)` pairs of the object keypoint matches
///
#[pyfunction]
#[pyo3(
    name = "compute_ttc_camera",
    signature = (prev_kpts, curr_kpts, matches, frame_rate, min_distance = crate::ttc::DEFAULT_MIN_CAMERA_DISTANCE)
)]
pub fn compute_ttc_camera_py(
    prev_kpts: Vec<(f32, f32)>,
    curr_kpts: Vec<(f32, f32)>,
    matches: Vec<(usize, usize)>,
    frame_rate: f64,
    min_distance: f64,
) -> PyResult<f64> {
    let to_kpts = |pts: Vec<(f32, f32)>| {
        pts.into_iter()
            .map(|(x, y)| Keypoint::new(x, y))
            .collect::<Vec<_>>()
    };
    let matches = matches
        .into_iter()
        .map(|(q, t)| KeypointMatch::new(q, t, 0.0))
        .collect::<Vec<_>>();
    compute_ttc_camera(
        &to_kpts(prev_kpts),
        &to_kpts(curr_kpts),
        &matches,
        frame_rate,
        min_distance,
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
#[pyo3(name = "ttc_fusion")]
fn ttc_fusion(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = pyo3_log::try_init();
    m.add_function(wrap_pyfunction!(median_py, m)?)?;
    m.add_function(wrap_pyfunction!(mean_py, m)?)?;
    m.add_function(wrap_pyfunction!(ttc_from_distances_py, m)?)?;
    m.add_function(wrap_pyfunction!(compute_ttc_lidar_py, m)?)?;
    m.add_function(wrap_pyfunction!(compute_ttc_camera_py, m)?)?;
    Ok(())
}
