pub use crate::association::match_bounding_boxes;
pub use crate::association::voting::BoxVoting;
pub use crate::camera::Projection;
pub use crate::frame::buffer::FrameBuffer;
pub use crate::frame::{BoundingBox, BoxMatches, DataFrame, Keypoint, KeypointMatch, LidarPoint};
pub use crate::keypoints::{cluster_kpt_matches_with_roi, KptMatchesClusterConf};
pub use crate::lidar::clustering::cluster_lidar_with_roi;
pub use crate::lidar::{crop_lidar_points, LidarRoi};
pub use crate::pipeline::config::FusionConfig;
pub use crate::pipeline::{FusionPipeline, TtcReport};
pub use crate::ttc::{compute_ttc_camera, compute_ttc_lidar, LidarTtcMethod, TtcResult};
pub use crate::utils::rect::Rect;
