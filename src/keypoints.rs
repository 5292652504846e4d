use crate::frame::{BoundingBox, Keypoint, KeypointMatch};
use crate::utils::stats::{min_max, NormalDistribution};
use anyhow::Result;
use log::debug;

/// Outlier rule applied to keypoint match displacements within a box
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KptMatchesClusterConf {
    /// Keep the matches with the displacement below `mean * threshold`
    Threshold(f64),
    /// Keep the matches with the displacement within `mean ± n * stddev`
    Stdev(f64),
}

impl Default for KptMatchesClusterConf {
    fn default() -> Self {
        KptMatchesClusterConf::Stdev(2.0)
    }
}

impl KptMatchesClusterConf {
    pub fn accepts(&self, displacement: f64, dist: &NormalDistribution) -> bool {
        match self {
            KptMatchesClusterConf::Threshold(threshold) => displacement < dist.mean * threshold,
            KptMatchesClusterConf::Stdev(n) => (displacement - dist.mean).abs() < n * dist.stddev,
        }
    }
}

/// Displacement statistics of a set of keypoint matches
///
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplacementStats {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl DisplacementStats {
    pub fn from_samples(vals: &[f64]) -> Self {
        let dist = NormalDistribution::from_samples(vals);
        let (min, max) = min_max(vals).unwrap_or_default();
        Self {
            mean: dist.mean,
            stddev: dist.stddev,
            min,
            max,
        }
    }
}

/// Diagnostics of the keypoint match clustering for a single box pair
///
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClusterReport {
    /// All matches between the frames
    pub total: usize,
    /// Matches enclosed by both rois
    pub enclosed: usize,
    /// Matches kept after the outlier rejection
    pub selected: usize,
    pub before: DisplacementStats,
    pub after: DisplacementStats,
}

/// Matches whose current keypoint lies in `curr_box` and previous keypoint lies in `prev_box`
///
pub fn enclosed_matches(
    kpt_matches: &[KeypointMatch],
    prev_kpts: &[Keypoint],
    curr_kpts: &[Keypoint],
    prev_box: &BoundingBox,
    curr_box: &BoundingBox,
) -> Result<Vec<KeypointMatch>> {
    let mut enclosed = Vec::with_capacity(kpt_matches.len());
    for m in kpt_matches {
        let (prev_kpt, curr_kpt) = m.resolve(prev_kpts, curr_kpts)?;
        if curr_box.roi.contains(&curr_kpt.pt) && prev_box.roi.contains(&prev_kpt.pt) {
            enclosed.push(*m);
        }
    }
    Ok(enclosed)
}

/// Pixel displacements of the matched keypoints
///
pub fn match_displacements(
    kpt_matches: &[KeypointMatch],
    prev_kpts: &[Keypoint],
    curr_kpts: &[Keypoint],
) -> Result<Vec<f64>> {
    kpt_matches
        .iter()
        .map(|m| m.displacement(prev_kpts, curr_kpts))
        .collect()
}

/// Associates the current box with the keypoint matches it encloses
///
/// The enclosed matches are filtered by `conf` against the displacement statistics of the enclosed set.
/// The selected matches replace `curr_box.kpt_matches` and their current keypoint indices replace
/// `curr_box.keypoints`.
///
pub fn cluster_kpt_matches_with_roi(
    conf: &KptMatchesClusterConf,
    kpt_matches: &[KeypointMatch],
    prev_kpts: &[Keypoint],
    curr_kpts: &[Keypoint],
    prev_box: &BoundingBox,
    curr_box: &mut BoundingBox,
) -> Result<ClusterReport> {
    let enclosed = enclosed_matches(kpt_matches, prev_kpts, curr_kpts, prev_box, curr_box)?;
    let displacements = match_displacements(&enclosed, prev_kpts, curr_kpts)?;
    let dist = NormalDistribution::from_samples(&displacements);

    let (selected, selected_displacements): (Vec<_>, Vec<_>) = enclosed
        .iter()
        .zip(displacements.iter())
        .filter(|(_, d)| conf.accepts(**d, &dist))
        .map(|(m, d)| (*m, *d))
        .unzip();

    let report = ClusterReport {
        total: kpt_matches.len(),
        enclosed: enclosed.len(),
        selected: selected.len(),
        before: DisplacementStats::from_samples(&displacements),
        after: DisplacementStats::from_samples(&selected_displacements),
    };
    debug!(
        "Box {}: kpt matches total {}, enclosed {}, selected {}; displacement before {:?}, after {:?}",
        curr_box.box_id, report.total, report.enclosed, report.selected, report.before, report.after
    );

    curr_box.keypoints = selected.iter().map(|m| m.train_idx).collect();
    curr_box.kpt_matches = selected;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::frame::{BoundingBox, Keypoint, KeypointMatch};
    use crate::keypoints::{cluster_kpt_matches_with_roi, enclosed_matches, KptMatchesClusterConf};
    use crate::utils::rect::Rect;
    use crate::EPS_F64;

    /// Keypoints moving right by the given displacements
    fn shifted(displacements: &[f32]) -> (Vec<Keypoint>, Vec<Keypoint>, Vec<KeypointMatch>) {
        let prev = (0..displacements.len())
            .map(|i| Keypoint::new(10.0, 10.0 + 5.0 * i as f32))
            .collect::<Vec<_>>();
        let curr = prev
            .iter()
            .zip(displacements)
            .map(|(k, d)| Keypoint::new(k.pt.x + d, k.pt.y))
            .collect::<Vec<_>>();
        let matches = (0..displacements.len())
            .map(|i| KeypointMatch::new(i, i, 1.0))
            .collect();
        (prev, curr, matches)
    }

    fn boxes() -> (BoundingBox, BoundingBox) {
        (
            BoundingBox::new(0, Rect::new(0.0, 0.0, 100.0, 100.0)),
            BoundingBox::new(0, Rect::new(0.0, 0.0, 100.0, 100.0)),
        )
    }

    #[test]
    fn enclosure() {
        let prev = vec![Keypoint::new(10.0, 10.0), Keypoint::new(150.0, 10.0), Keypoint::new(20.0, 20.0)];
        let curr = vec![Keypoint::new(12.0, 10.0), Keypoint::new(12.0, 10.0), Keypoint::new(120.0, 20.0)];
        let matches = (0..3).map(|i| KeypointMatch::new(i, i, 1.0)).collect::<Vec<_>>();
        let (prev_box, curr_box) = boxes();
        let enclosed = enclosed_matches(&matches, &prev, &curr, &prev_box, &curr_box).unwrap();
        assert_eq!(enclosed, vec![matches[0]]);
    }

    #[test]
    fn stdev_rejects_outlier() {
        // mean 5.9, stddev 14.7
        let (prev, curr, matches) =
            shifted(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0]);
        let (prev_box, mut curr_box) = boxes();
        let report = cluster_kpt_matches_with_roi(
            &KptMatchesClusterConf::Stdev(2.0),
            &matches,
            &prev,
            &curr,
            &prev_box,
            &mut curr_box,
        )
        .unwrap();

        assert_eq!(report.total, 10);
        assert_eq!(report.enclosed, 10);
        assert_eq!(report.selected, 9);
        assert!((report.before.mean - 5.9).abs() < 1e-6);
        assert!((report.before.stddev - 14.7).abs() < 1e-6);
        assert!((report.before.max - 50.0).abs() < EPS_F64);
        assert!((report.after.mean - 1.0).abs() < EPS_F64);
        assert!(report.after.stddev.abs() < EPS_F64);
        assert_eq!(curr_box.kpt_matches, matches[..9].to_vec());
        assert_eq!(curr_box.keypoints, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn stdev_small_sample_keeps_all() {
        let (prev, curr, matches) = shifted(&[2.0, 2.0, 2.0, 20.0]);
        let (prev_box, mut curr_box) = boxes();
        let report = cluster_kpt_matches_with_roi(
            &KptMatchesClusterConf::Stdev(2.0),
            &matches,
            &prev,
            &curr,
            &prev_box,
            &mut curr_box,
        )
        .unwrap();
        // with 4 samples a single value is never farther than sqrt(3) stddev from the mean
        assert_eq!(report.selected, 4);
    }

    #[test]
    fn threshold() {
        // mean 4.0, threshold 1.5: displacements below 6.0 are kept
        let (prev, curr, matches) = shifted(&[2.0, 3.0, 4.0, 5.0, 6.0]);
        let (prev_box, mut curr_box) = boxes();
        let report = cluster_kpt_matches_with_roi(
            &KptMatchesClusterConf::Threshold(1.5),
            &matches,
            &prev,
            &curr,
            &prev_box,
            &mut curr_box,
        )
        .unwrap();
        assert_eq!(report.selected, 4);
        assert_eq!(curr_box.keypoints, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_cluster_is_stable() {
        let (prev_box, mut curr_box) = boxes();
        curr_box.kpt_matches = vec![KeypointMatch::new(0, 0, 0.0)];
        let report = cluster_kpt_matches_with_roi(
            &KptMatchesClusterConf::default(),
            &[],
            &[],
            &[],
            &prev_box,
            &mut curr_box,
        )
        .unwrap();
        assert_eq!(report.enclosed, 0);
        assert_eq!(report.selected, 0);
        assert!(curr_box.kpt_matches.is_empty());
    }
}
