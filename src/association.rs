use crate::association::voting::{BoxVote, BoxVoting};
use crate::frame::{BoxMatches, DataFrame};
use anyhow::Result;
use log::info;

/// Majority voting over keypoint matches
///
pub mod voting;

/// Collects the votes of keypoint matches for (current box, previous box) pairs
///
/// A match votes for every pair where the current box roi contains the current keypoint and the previous
/// box roi contains the previous keypoint.
///
pub fn collect_votes(prev: &DataFrame, curr: &DataFrame) -> Result<Vec<BoxVote>> {
    let mut votes = Vec::new();
    for m in &curr.kpt_matches {
        let (prev_kpt, curr_kpt) = m.resolve(&prev.keypoints, &curr.keypoints)?;
        for curr_box in curr
            .bounding_boxes
            .iter()
            .filter(|b| b.roi.contains(&curr_kpt.pt))
        {
            votes.extend(
                prev.bounding_boxes
                    .iter()
                    .filter(|b| b.roi.contains(&prev_kpt.pt))
                    .map(|prev_box| BoxVote {
                        current: curr_box.box_id,
                        previous: prev_box.box_id,
                    }),
            );
        }
    }
    Ok(votes)
}

/// Associates the bounding boxes of the current frame with the bounding boxes of the previous frame
///
/// The matches of `curr` are expected to link `prev` keypoints (`query_idx`) with `curr` keypoints
/// (`train_idx`). Every previous box is associated with at most one current box.
///
pub fn match_bounding_boxes(
    voting: &BoxVoting,
    prev: &DataFrame,
    curr: &DataFrame,
) -> Result<BoxMatches> {
    let votes = collect_votes(prev, curr)?;
    let current_boxes = curr.bounding_boxes.iter().map(|b| b.box_id).collect::<Vec<_>>();
    let previous_boxes = prev.bounding_boxes.iter().map(|b| b.box_id).collect::<Vec<_>>();
    let matches = voting.winners(votes, &current_boxes, &previous_boxes);
    info!(
        "Frame {}: {} of {} bounding boxes associated with frame {}",
        curr.index,
        matches.len(),
        current_boxes.len(),
        prev.index
    );
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use crate::association::match_bounding_boxes;
    use crate::association::voting::BoxVoting;
    use crate::frame::{BoundingBox, BoxMatches, DataFrame, Keypoint, KeypointMatch};
    use crate::utils::rect::Rect;
    use itertools::Itertools;

    fn frame(index: u64, boxes: &[(u32, Rect)], kpts: &[(f32, f32)]) -> DataFrame {
        let mut f = DataFrame::new(index);
        f.bounding_boxes = boxes
            .iter()
            .map(|(id, roi)| BoundingBox::new(*id, *roi))
            .collect();
        f.keypoints = kpts.iter().map(|(x, y)| Keypoint::new(*x, *y)).collect();
        f
    }

    #[test]
    fn objects_are_tracked() {
        let prev = frame(
            0,
            &[
                (0, Rect::new(0.0, 0.0, 100.0, 100.0)),
                (1, Rect::new(200.0, 0.0, 100.0, 100.0)),
            ],
            &[(10.0, 10.0), (20.0, 20.0), (210.0, 10.0), (220.0, 20.0)],
        );
        // objects swapped positions in the list and moved a bit
        let mut curr = frame(
            1,
            &[
                (5, Rect::new(205.0, 0.0, 100.0, 100.0)),
                (6, Rect::new(5.0, 0.0, 100.0, 100.0)),
                (7, Rect::new(500.0, 0.0, 50.0, 50.0)),
            ],
            &[(15.0, 10.0), (25.0, 20.0), (215.0, 10.0), (225.0, 20.0)],
        );
        curr.kpt_matches = (0..4).map(|i| KeypointMatch::new(i, i, 1.0)).collect();

        let matches = match_bounding_boxes(&BoxVoting::default(), &prev, &curr).unwrap();
        assert_eq!(matches, BoxMatches::from([(0, 6), (1, 5)]));
    }

    #[test]
    fn injective_association() {
        // one previous box is split into two current boxes
        let prev = frame(
            0,
            &[(0, Rect::new(0.0, 0.0, 300.0, 100.0))],
            &(0..30).map(|i| (i as f32 * 10.0, 50.0)).collect::<Vec<_>>(),
        );
        let mut curr = frame(
            1,
            &[
                (0, Rect::new(0.0, 0.0, 150.0, 100.0)),
                (1, Rect::new(150.0, 0.0, 150.0, 100.0)),
            ],
            &(0..30).map(|i| (i as f32 * 10.0, 50.0)).collect::<Vec<_>>(),
        );
        curr.kpt_matches = (0..30).map(|i| KeypointMatch::new(i, i, 1.0)).collect();

        let matches = match_bounding_boxes(&BoxVoting::default(), &prev, &curr).unwrap();
        assert_eq!(matches, BoxMatches::from([(0, 0)]));
        assert!(matches.values().all_unique());
    }

    #[test]
    fn broken_match_index() {
        let prev = frame(0, &[(0, Rect::new(0.0, 0.0, 10.0, 10.0))], &[(1.0, 1.0)]);
        let mut curr = frame(1, &[(0, Rect::new(0.0, 0.0, 10.0, 10.0))], &[(1.0, 1.0)]);
        curr.kpt_matches = vec![KeypointMatch::new(3, 0, 1.0)];
        assert!(match_bounding_boxes(&BoxVoting::default(), &prev, &curr).is_err());
    }

    #[test]
    fn no_matches_no_associations() {
        let prev = frame(0, &[(0, Rect::new(0.0, 0.0, 10.0, 10.0))], &[]);
        let curr = frame(1, &[(0, Rect::new(0.0, 0.0, 10.0, 10.0))], &[]);
        assert!(match_bounding_boxes(&BoxVoting::default(), &prev, &curr)
            .unwrap()
            .is_empty());
    }
}
