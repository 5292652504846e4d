use crate::camera::Projection;
use crate::frame::{BoundingBox, LidarPoint};
use anyhow::Result;
use log::debug;

/// Outcome counters of the Lidar point assignment
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LidarClusterStats {
    /// Points assigned to exactly one box
    pub assigned: usize,
    /// Points enclosed by two or more boxes, dropped
    pub ambiguous: usize,
    /// Points outside of every box or behind the camera, dropped
    pub unassigned: usize,
}

/// Groups the Lidar points whose projection falls into the same bounding box
///
/// Every box is shrunk by `shrink_factor` before the containment test to keep the points
/// near the edges of a roi out of the object. A point enclosed by more than one box is dropped.
///
/// # Parameters
/// * `boxes` - bounding boxes of the frame, the points are appended to their `lidar_points`
/// * `points` - Lidar points of the frame
/// * `shrink_factor` - shrink factor in `[0, 1)`
/// * `projection` - Lidar to image projection
///
pub fn cluster_lidar_with_roi(
    boxes: &mut [BoundingBox],
    points: &[LidarPoint],
    shrink_factor: f32,
    projection: &Projection,
) -> Result<LidarClusterStats> {
    let shrunk = boxes
        .iter()
        .map(|b| b.roi.shrink(shrink_factor))
        .collect::<Result<Vec<_>>>()?;

    let mut stats = LidarClusterStats::default();
    let mut enclosing = Vec::with_capacity(boxes.len());

    for p in points {
        let px = match projection.project(p) {
            Some(px) => px,
            None => {
                stats.unassigned += 1;
                continue;
            }
        };

        enclosing.clear();
        enclosing.extend(
            shrunk
                .iter()
                .enumerate()
                .filter(|(_, roi)| roi.contains(&px))
                .map(|(i, _)| i),
        );

        match enclosing.as_slice() {
            [single] => {
                boxes[*single].lidar_points.push(*p);
                stats.assigned += 1;
            }
            [] => stats.unassigned += 1,
            _ => stats.ambiguous += 1,
        }
    }

    debug!(
        "Lidar points clustered: {} assigned, {} ambiguous, {} unassigned",
        stats.assigned, stats.ambiguous, stats.unassigned
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use crate::camera::Projection;
    use crate::frame::{BoundingBox, LidarPoint};
    use crate::lidar::clustering::{cluster_lidar_with_roi, LidarClusterStats};
    use crate::utils::rect::Rect;
    use itertools::Itertools;

    // focal 1000, principal point (600, 200): u = 600 - 100 * y, v = 200 - 100 * z at x = 10
    fn projection() -> Projection {
        Projection::pinhole(1000.0, 600.0, 200.0)
    }

    fn point(y: f64, z: f64) -> LidarPoint {
        LidarPoint::new(10.0, y, z, 1.0)
    }

    #[test]
    fn single_box() {
        let mut boxes = vec![BoundingBox::new(0, Rect::new(500.0, 200.0, 200.0, 100.0))];
        let points = vec![
            // (600, 250)
            point(0.0, -0.5),
            // (505, 250) - inside the roi, but outside of the shrunk one
            point(0.95, -0.5),
            // far away
            point(5.0, -0.5),
        ];
        let stats = cluster_lidar_with_roi(&mut boxes, &points, 0.1, &projection()).unwrap();
        assert_eq!(
            stats,
            LidarClusterStats {
                assigned: 1,
                ambiguous: 0,
                unassigned: 2
            }
        );
        assert_eq!(boxes[0].lidar_points, vec![point(0.0, -0.5)]);
    }

    #[test]
    fn overlapping_boxes_drop_points() {
        let mut boxes = vec![
            BoundingBox::new(0, Rect::new(400.0, 200.0, 200.0, 100.0)),
            BoundingBox::new(1, Rect::new(500.0, 200.0, 200.0, 100.0)),
        ];
        let points = vec![
            // (450, 250) - only the first box
            point(1.5, -0.5),
            // (550, 250) - both boxes
            point(0.5, -0.5),
            // (650, 250) - only the second box
            point(-0.5, -0.5),
            // behind the camera
            LidarPoint::new(-10.0, 0.0, -0.5, 1.0),
        ];
        let stats = cluster_lidar_with_roi(&mut boxes, &points, 0.0, &projection()).unwrap();
        assert_eq!(stats.assigned, 2);
        assert_eq!(stats.ambiguous, 1);
        assert_eq!(stats.unassigned, 1);
        assert_eq!(boxes[0].lidar_points, vec![point(1.5, -0.5)]);
        assert_eq!(boxes[1].lidar_points, vec![point(-0.5, -0.5)]);
    }

    #[test]
    fn no_point_in_two_boxes() {
        let mut boxes = (0..4)
            .map(|i| BoundingBox::new(i, Rect::new(450.0 + 40.0 * i as f32, 150.0, 120.0, 150.0)))
            .collect::<Vec<_>>();
        let points = (0..40)
            .cartesian_product(0..20)
            .map(|(y, z)| point(2.0 - 0.1 * y as f64, 0.5 - 0.1 * z as f64))
            .collect::<Vec<_>>();
        let stats = cluster_lidar_with_roi(&mut boxes, &points, 0.1, &projection()).unwrap();
        assert_eq!(stats.assigned + stats.ambiguous + stats.unassigned, points.len());

        let assigned = boxes
            .iter()
            .flat_map(|b| b.lidar_points.iter())
            .map(|p| ((p.y * 10.0).round() as i64, (p.z * 10.0).round() as i64))
            .collect::<Vec<_>>();
        assert_eq!(assigned.len(), stats.assigned);
        assert!(assigned.iter().all_unique());
    }

    #[test]
    fn invalid_shrink_factor() {
        let mut boxes = vec![BoundingBox::new(0, Rect::new(500.0, 200.0, 200.0, 100.0))];
        assert!(cluster_lidar_with_roi(&mut boxes, &[], 1.5, &projection()).is_err());
    }
}
