use crate::frame::LidarPoint;
use crate::EPS_F64;
use nalgebra::{Matrix3x4, Matrix4, Point2, Vector4};

/// Lidar to image projection
///
/// The projection is the composition `P_rect * R_rect * RT` where
/// * `P_rect` - 3x4 camera projection matrix after rectification
/// * `R_rect` - rectifying rotation (in the homogeneous 4x4 form) that makes image planes co-planar
/// * `RT` - Lidar to camera rotation and translation
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    matrix: Matrix3x4<f64>,
}

impl Default for Projection {
    fn default() -> Self {
        Self::kitti()
    }
}

impl Projection {
    pub fn new(p_rect: &Matrix3x4<f64>, r_rect: &Matrix4<f64>, rt: &Matrix4<f64>) -> Self {
        Self {
            matrix: p_rect * r_rect * rt,
        }
    }

    /// Projection from the already composed 3x4 matrix
    ///
    pub fn from_matrix(matrix: Matrix3x4<f64>) -> Self {
        Self { matrix }
    }

    /// Ideal pinhole camera looking along the Lidar `x` axis and mounted at the Lidar origin
    ///
    /// # Parameters
    /// * `focal` - focal length in pixels
    /// * `cx`, `cy` - principal point in pixels
    ///
    pub fn pinhole(focal: f64, cx: f64, cy: f64) -> Self {
        #[rustfmt::skip]
        let p_rect = Matrix3x4::new(
            focal, 0.0, cx, 0.0,
            0.0, focal, cy, 0.0,
            0.0, 0.0, 1.0, 0.0,
        );
        #[rustfmt::skip]
        let rt = Matrix4::new(
            0.0, -1.0, 0.0, 0.0,
            0.0, 0.0, -1.0, 0.0,
            1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self::new(&p_rect, &Matrix4::identity(), &rt)
    }

    /// Calibration of the KITTI 2011_09_26 recordings, left color camera (image_02) and Velodyne
    ///
    pub fn kitti() -> Self {
        #[rustfmt::skip]
        let rt = Matrix4::new(
            7.533745e-03, -9.999714e-01, -6.166020e-04, -4.069766e-03,
            1.480249e-02, 7.280733e-04, -9.998902e-01, -7.631618e-02,
            9.998621e-01, 7.523790e-03, 1.480755e-02, -2.717806e-01,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let r_rect = Matrix4::new(
            9.999239e-01, 9.837760e-03, -7.445048e-03, 0.0,
            -9.869795e-03, 9.999421e-01, -4.278459e-03, 0.0,
            7.402527e-03, 4.351614e-03, 9.999631e-01, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let p_rect = Matrix3x4::new(
            7.215377e+02, 0.000000e+00, 6.095593e+02, 0.000000e+00,
            0.000000e+00, 7.215377e+02, 1.728540e+02, 0.000000e+00,
            0.000000e+00, 0.000000e+00, 1.000000e+00, 0.000000e+00,
        );
        Self::new(&p_rect, &r_rect, &rt)
    }

    pub fn matrix(&self) -> &Matrix3x4<f64> {
        &self.matrix
    }

    /// Projects the Lidar point into the image
    ///
    /// Returns `None` when the point is on or behind the image plane.
    ///
    pub fn project(&self, p: &LidarPoint) -> Option<Point2<f32>> {
        let y = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        if y[2] <= EPS_F64 {
            return None;
        }
        Some(Point2::new((y[0] / y[2]) as f32, (y[1] / y[2]) as f32))
    }
}
