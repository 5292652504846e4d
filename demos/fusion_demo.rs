use anyhow::Result;
use log::info;
use ttc_fusion::examples::SceneGen;
use ttc_fusion::prelude::{FusionConfig, FusionPipeline, LidarRoi, Projection, TtcResult};

fn main() -> Result<()> {
    env_logger::init();

    // the preceding vehicle in the ego-lane and a parked car on the right, outside of the lane roi
    let roi = LidarRoi {
        max_z: 0.0,
        ..LidarRoi::ego_lane()
    };
    let config = FusionConfig::default()
        .with_projection(Projection::kitti())
        .with_lidar_roi(roi);
    let frame_rate = config.frame_rate;
    let mut pipeline = FusionPipeline::new(config)?;

    let scene = SceneGen::new(Projection::kitti(), frame_rate)
        .object(0.0, 12.0, 4.0, 60, 200)
        .object(-3.5, 16.0, 0.0, 40, 150);

    for frame in scene.take(18) {
        for report in pipeline.push_frame(frame)? {
            let ttc = report.ttc;
            eprintln!(
                "Frame {} box {} => {}: TTC Lidar {:>8.3}s ({}), TTC camera {:>8.3}s ({}), kpt matches {} of {}",
                pipeline.buffer().pushed() - 1,
                report.prev_box_id,
                report.curr_box_id,
                ttc.lidar,
                actionable(TtcResult::is_actionable(ttc.lidar)),
                ttc.camera,
                actionable(TtcResult::is_actionable(ttc.camera)),
                report.cluster.selected,
                report.cluster.enclosed,
            );
        }
    }

    if let Ok(frame) = pipeline.buffer().current() {
        for b in &frame.bounding_boxes {
            info!("Box {}: Lidar summary {:?}", b.box_id, b.lidar_summary());
        }
    }
    Ok(())
}

fn actionable(flag: bool) -> &'static str {
    if flag {
        "closing"
    } else {
        "not closing"
    }
}
