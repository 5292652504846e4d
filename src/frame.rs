use crate::lidar::{summarize, LidarSummary};
use crate::utils::rect::Rect;
use crate::Errors;
use anyhow::Result;
use nalgebra::Point2;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Two-slot sliding window over consecutive frames
///
pub mod buffer;

/// Single Lidar sample
///
/// `x`, `y`, `z` are in meters in the sensor coordinates (`x` points forward, `y` to the left, `z` up),
/// `r` is the reflectivity of the point.
///
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LidarPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
}

impl LidarPoint {
    pub fn new(x: f64, y: f64, z: f64, r: f64) -> Self {
        Self { x, y, z, r }
    }
}

/// Image feature produced by an external detector
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub pt: Point2<f32>,
    pub size: f32,
    pub response: f32,
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            pt: Point2::origin(),
            size: 1.0,
            response: 0.0,
        }
    }
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pt: Point2::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_response(mut self, response: f32) -> Self {
        self.response = response;
        self
    }

    /// Euclidean pixel distance between keypoint positions
    ///
    pub fn distance(&self, other: &Keypoint) -> f64 {
        nalgebra::distance(&self.pt.cast::<f64>(), &other.pt.cast::<f64>())
    }
}

/// Keypoint correspondence between two consecutive frames
///
/// * `query_idx` - index of the keypoint in the previous frame
/// * `train_idx` - index of the keypoint in the current frame
/// * `distance` - descriptor distance reported by the matcher
///
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeypointMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f32,
}

impl KeypointMatch {
    pub fn new(query_idx: usize, train_idx: usize, distance: f32) -> Self {
        Self {
            query_idx,
            train_idx,
            distance,
        }
    }

    /// Resolves the previous and the current keypoints of the correspondence
    ///
    pub fn resolve<'a>(
        &self,
        prev_kpts: &'a [Keypoint],
        curr_kpts: &'a [Keypoint],
    ) -> Result<(&'a Keypoint, &'a Keypoint)> {
        Ok((
            keypoint_at(prev_kpts, self.query_idx)?,
            keypoint_at(curr_kpts, self.train_idx)?,
        ))
    }

    /// Pixel displacement between the previous and the current keypoints
    ///
    pub fn displacement(&self, prev_kpts: &[Keypoint], curr_kpts: &[Keypoint]) -> Result<f64> {
        let (prev, curr) = self.resolve(prev_kpts, curr_kpts)?;
        Ok(curr.distance(prev))
    }
}

/// Checked keypoint access by index
///
pub fn keypoint_at(kpts: &[Keypoint], index: usize) -> Result<&Keypoint> {
    kpts.get(index).ok_or_else(|| {
        Errors::KeypointOutOfRange {
            index,
            len: kpts.len(),
        }
        .into()
    })
}

/// Classified object detected in the camera image together with the data associated with it
/// during the current cycle
///
#[derive(Debug, Clone, Default)]
pub struct BoundingBox {
    /// Unique identifier of the box within its frame
    pub box_id: u32,
    pub track_id: Option<u32>,
    /// 2D region of interest in image coordinates
    pub roi: Rect,
    pub class_id: u32,
    pub confidence: f32,
    /// Lidar points which project into the (shrunk) roi
    pub lidar_points: Vec<LidarPoint>,
    /// Indices of the current frame keypoints that belong to the object
    pub keypoints: Vec<usize>,
    /// Keypoint matches enclosed by the roi
    pub kpt_matches: Vec<KeypointMatch>,
}

impl BoundingBox {
    pub fn new(box_id: u32, roi: Rect) -> Self {
        Self {
            box_id,
            roi,
            ..Default::default()
        }
    }

    pub fn class(mut self, class_id: u32, confidence: f32) -> Self {
        self.class_id = class_id;
        self.confidence = confidence;
        self
    }

    /// Top-view statistics of the Lidar points owned by the box
    ///
    pub fn lidar_summary(&self) -> Option<LidarSummary> {
        summarize(&self.lidar_points)
    }
}

/// Finds the box by its id
///
pub fn find_bounding_box(boxes: &[BoundingBox], box_id: u32) -> Option<&BoundingBox> {
    boxes.iter().find(|b| b.box_id == box_id)
}

pub fn find_bounding_box_mut(boxes: &mut [BoundingBox], box_id: u32) -> Option<&mut BoundingBox> {
    boxes.iter_mut().find(|b| b.box_id == box_id)
}

/// Bounding box associations between frames: previous frame box id -> current frame box id
///
pub type BoxMatches = BTreeMap<u32, u32>;

/// All sensor information available for the same time instance
///
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    /// Sequential number of the frame
    pub index: u64,
    /// Handle of the camera image, the image itself is owned by the caller
    pub image: Option<PathBuf>,
    pub keypoints: Vec<Keypoint>,
    /// Opaque descriptor blob produced by the external extractor
    pub descriptors: Vec<u8>,
    /// Keypoint matches between the previous and the current frame
    pub kpt_matches: Vec<KeypointMatch>,
    pub lidar_points: Vec<LidarPoint>,
    pub bounding_boxes: Vec<BoundingBox>,
    pub bb_matches: BoxMatches,
}

impl DataFrame {
    pub fn new(index: u64) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn bounding_box(&self, box_id: u32) -> Result<&BoundingBox> {
        find_bounding_box(&self.bounding_boxes, box_id)
            .ok_or_else(|| Errors::MissingBoundingBox(box_id).into())
    }
}
