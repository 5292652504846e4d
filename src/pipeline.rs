use crate::association::match_bounding_boxes;
use crate::association::voting::BoxVoting;
use crate::frame::buffer::FrameBuffer;
use crate::frame::{find_bounding_box_mut, DataFrame};
use crate::keypoints::{cluster_kpt_matches_with_roi, ClusterReport};
use crate::lidar::clustering::cluster_lidar_with_roi;
use crate::lidar::crop_lidar_points;
use crate::pipeline::config::FusionConfig;
use crate::ttc::{compute_ttc_camera, compute_ttc_lidar, TtcResult};
use crate::Errors;
use anyhow::Result;
use log::info;

/// Fusion cycle parameters
///
pub mod config;

/// Time-to-collision of an object tracked between the previous and the current frames
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtcReport {
    pub prev_box_id: u32,
    pub curr_box_id: u32,
    pub ttc: TtcResult,
    pub cluster: ClusterReport,
}

/// Sensor fusion cycle driver
///
/// Every pushed frame gets its Lidar points cropped (when the roi is configured) and distributed
/// among its bounding boxes. Starting from the second frame the boxes are associated with the boxes
/// of the previous frame and the time-to-collision is estimated for every associated pair.
///
#[derive(Debug)]
pub struct FusionPipeline {
    buffer: FrameBuffer,
    config: FusionConfig,
}

impl FusionPipeline {
    pub fn new(config: FusionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buffer: FrameBuffer::new(),
            config,
        })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Runs the cycle for the new frame
    ///
    /// The frame index is replaced with the sequential number of the frame. Returns an empty report
    /// list for the very first frame.
    ///
    pub fn push_frame(&mut self, mut frame: DataFrame) -> Result<Vec<TtcReport>> {
        frame.index = self.buffer.pushed();
        if let Some(roi) = &self.config.lidar_roi {
            crop_lidar_points(&mut frame.lidar_points, roi);
        }
        cluster_lidar_with_roi(
            &mut frame.bounding_boxes,
            &frame.lidar_points,
            self.config.shrink_factor,
            &self.config.projection,
        )?;
        self.buffer.push(frame);

        if !self.buffer.is_full() {
            return Ok(Vec::default());
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> Result<Vec<TtcReport>> {
        let voting = BoxVoting::new(self.config.min_votes);
        let (prev, curr) = self.buffer.pair_mut()?;
        curr.bb_matches = match_bounding_boxes(&voting, prev, curr)?;
        evaluate_ttc(&self.config, prev, curr)
    }
}

/// Clusters the keypoint matches and estimates the time-to-collision for every box pair
/// associated in `curr.bb_matches`
///
/// The Lidar estimate is `NaN` when any of the boxes has no Lidar points.
///
pub fn evaluate_ttc(
    config: &FusionConfig,
    prev: &DataFrame,
    curr: &mut DataFrame,
) -> Result<Vec<TtcReport>> {
    let DataFrame {
        index,
        keypoints,
        kpt_matches,
        bounding_boxes,
        bb_matches,
        ..
    } = curr;

    let mut reports = Vec::with_capacity(bb_matches.len());
    for (&prev_box_id, &curr_box_id) in bb_matches.iter() {
        let prev_box = prev.bounding_box(prev_box_id)?;
        let curr_box = find_bounding_box_mut(bounding_boxes, curr_box_id)
            .ok_or(Errors::MissingBoundingBox(curr_box_id))?;

        let cluster = cluster_kpt_matches_with_roi(
            &config.cluster,
            kpt_matches,
            &prev.keypoints,
            keypoints,
            prev_box,
            curr_box,
        )?;

        let lidar = if prev_box.lidar_points.is_empty() || curr_box.lidar_points.is_empty() {
            f64::NAN
        } else {
            compute_ttc_lidar(
                config.lidar_method,
                &prev_box.lidar_points,
                &curr_box.lidar_points,
                config.frame_rate,
            )
        };
        let camera = compute_ttc_camera(
            &prev.keypoints,
            keypoints,
            &curr_box.kpt_matches,
            config.frame_rate,
            config.min_camera_distance,
        )?;

        info!(
            "Frame {}: box {} => {}, TTC Lidar {:.3}s, TTC camera {:.3}s",
            index, prev_box_id, curr_box_id, lidar, camera
        );
        reports.push(TtcReport {
            prev_box_id,
            curr_box_id,
            ttc: TtcResult { lidar, camera },
            cluster,
        });
    }
    Ok(reports)
}
