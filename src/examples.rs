use crate::camera::Projection;
use crate::frame::{BoundingBox, DataFrame, Keypoint, KeypointMatch, LidarPoint};
use crate::utils::rect::Rect;
use rand::distributions::Uniform;
use rand::prelude::ThreadRng;
use rand::Rng;

/// Half of the rear plane width, meters
pub const PLANE_HALF_WIDTH: f64 = 0.9;

/// Rear plane height, meters; the plane spans `z` from `-PLANE_HEIGHT` to `0`
pub const PLANE_HEIGHT: f64 = 1.0;

/// The scene stops once an object comes closer than that, meters
pub const MIN_SCENE_DISTANCE: f64 = 1.0;

pub const CAR_CLASS: u32 = 2;

struct PlaneObject {
    lateral: f64,
    distance: f64,
    speed: f64,
    /// (y, z) positions of the features on the plane
    features: Vec<(f64, f64)>,
    /// (y, z) positions of the Lidar returns on the plane
    returns: Vec<(f64, f64)>,
}

/// Synthetic scene: flat rear planes of vehicles approaching the ego vehicle with constant speeds
///
/// Every generated frame carries a bounding box per object (the projection of its plane),
/// the projected features as keypoints, the Lidar returns on the plane, and the identity keypoint
/// matches with the previous frame. Since the objects are rigid planes, the expected
/// time-to-collision for the frame is `distance / speed` both for the Lidar and the camera.
///
pub struct SceneGen {
    projection: Projection,
    frame_rate: f64,
    objects: Vec<PlaneObject>,
    frame: u64,
    gen: ThreadRng,
}

impl SceneGen {
    pub fn new(projection: Projection, frame_rate: f64) -> Self {
        Self {
            projection,
            frame_rate,
            objects: Vec::new(),
            frame: 0,
            gen: rand::thread_rng(),
        }
    }

    /// Adds an object
    ///
    /// # Parameters
    /// * `lateral` - lateral offset of the plane center, meters (positive to the left)
    /// * `distance` - initial distance, meters
    /// * `speed` - closing speed, meters per second
    /// * `features` - amount of image features on the plane
    /// * `returns` - amount of Lidar returns on the plane
    ///
    pub fn object(
        mut self,
        lateral: f64,
        distance: f64,
        speed: f64,
        features: usize,
        returns: usize,
    ) -> Self {
        let feature_y = Uniform::new(lateral - 0.85, lateral + 0.85);
        let feature_z = Uniform::new(-0.95, -0.05);
        let return_y = Uniform::new(
            lateral - 0.8 * PLANE_HALF_WIDTH,
            lateral + 0.8 * PLANE_HALF_WIDTH,
        );
        let return_z = Uniform::new(-0.9 * PLANE_HEIGHT, -0.1 * PLANE_HEIGHT);

        let features = (0..features)
            .map(|_| (self.gen.sample(feature_y), self.gen.sample(feature_z)))
            .collect();
        let returns = (0..returns)
            .map(|_| (self.gen.sample(return_y), self.gen.sample(return_z)))
            .collect();

        self.objects.push(PlaneObject {
            lateral,
            distance,
            speed,
            features,
            returns,
        });
        self
    }

    /// Current distance to the object
    ///
    pub fn distance(&self, object: usize) -> Option<f64> {
        self.objects.get(object).map(|o| o.distance)
    }

    /// Expected time-to-collision of the object in the lastly generated frame
    ///
    pub fn expected_ttc(&self, object: usize) -> Option<f64> {
        self.objects
            .get(object)
            .map(|o| (o.distance + o.speed / self.frame_rate) / o.speed)
    }

    fn project(&self, x: f64, y: f64, z: f64) -> Option<nalgebra::Point2<f32>> {
        self.projection.project(&LidarPoint::new(x, y, z, 1.0))
    }
}

impl Iterator for SceneGen {
    type Item = DataFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self
            .objects
            .iter()
            .any(|o| o.distance <= MIN_SCENE_DISTANCE)
        {
            return None;
        }

        let mut frame = DataFrame::new(self.frame);
        for (id, o) in self.objects.iter().enumerate() {
            let a = self.project(o.distance, o.lateral + PLANE_HALF_WIDTH, 0.0)?;
            let b = self.project(o.distance, o.lateral - PLANE_HALF_WIDTH, -PLANE_HEIGHT)?;
            frame
                .bounding_boxes
                .push(BoundingBox::new(id as u32, Rect::from_corners(&a, &b)).class(CAR_CLASS, 0.9));

            for (y, z) in &o.features {
                let pt = self.project(o.distance, *y, *z)?;
                frame.keypoints.push(Keypoint::new(pt.x, pt.y));
            }

            frame.lidar_points.extend(
                o.returns
                    .iter()
                    .map(|(y, z)| LidarPoint::new(o.distance, *y, *z, 0.5)),
            );
        }

        // detector output order is not stable between frames
        if self.frame % 2 == 1 {
            frame.bounding_boxes.reverse();
        }

        if self.frame > 0 {
            frame.kpt_matches = (0..frame.keypoints.len())
                .map(|i| KeypointMatch::new(i, i, 0.0))
                .collect();
        }

        for o in &mut self.objects {
            o.distance -= o.speed / self.frame_rate;
        }
        self.frame += 1;
        Some(frame)
    }
}
