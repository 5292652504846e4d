use crate::frame::BoxMatches;
use itertools::Itertools;
use log::{debug, warn};
use std::collections::HashMap;

/// Single keypoint correspondence vote: the current box and the previous box enclose the matched keypoints
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxVote {
    pub current: u32,
    pub previous: u32,
}

/// The winner selected for a current frame box
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxVotingElt {
    pub query_box: u32,
    pub winner_box: u32,
    pub votes: usize,
}

/// Majority voting engine that links the current frame boxes to the previous frame boxes
///
/// It calculates winners as:
/// 1. counts votes by (current box, previous box) pairs
/// 2. for every current box selects the previous box with the most votes; on a tie the box met first
///    in `previous_boxes` wins
/// 3. drops the winners with less than `min_votes` votes
/// 4. a previous box already taken by a current box met earlier in `current_boxes` is not reassigned
///
pub struct BoxVoting {
    min_votes: usize,
}

impl Default for BoxVoting {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BoxVoting {
    /// Constructs new engine
    ///
    /// # Arguments
    /// * `min_votes` - minimal amount of votes required for the pair to be associated, at least 1
    ///
    pub fn new(min_votes: usize) -> Self {
        Self {
            min_votes: min_votes.max(1),
        }
    }

    /// Per current box winners, before the conflicts between current boxes are resolved
    ///
    pub fn candidates<T>(
        &self,
        votes: T,
        current_boxes: &[u32],
        previous_boxes: &[u32],
    ) -> Vec<BoxVotingElt>
    where
        T: IntoIterator<Item = BoxVote>,
    {
        let counts: HashMap<BoxVote, usize> = votes.into_iter().counts();
        debug!("Box votes: {:?}", &counts);

        current_boxes
            .iter()
            .flat_map(|&current| {
                let mut best: Option<BoxVotingElt> = None;
                for &previous in previous_boxes {
                    let votes = counts
                        .get(&BoxVote { current, previous })
                        .copied()
                        .unwrap_or(0);
                    if votes >= self.min_votes && best.map_or(true, |b| votes > b.votes) {
                        best = Some(BoxVotingElt {
                            query_box: current,
                            winner_box: previous,
                            votes,
                        });
                    }
                }
                if best.is_none() {
                    debug!(" >>> previousBoxID -> currentBoxID: NONE => {}", current);
                }
                best
            })
            .collect()
    }

    /// Associations of previous frame boxes to current frame boxes
    ///
    pub fn winners<T>(&self, votes: T, current_boxes: &[u32], previous_boxes: &[u32]) -> BoxMatches
    where
        T: IntoIterator<Item = BoxVote>,
    {
        let mut matches = BoxMatches::new();
        for c in self.candidates(votes, current_boxes, previous_boxes) {
            if let Some(taken_by) = matches.get(&c.winner_box) {
                warn!(
                    " >>> Skipping ... currentBoxID ({}) - previousBoxID {} is already associated with currentBoxID {}",
                    c.query_box, c.winner_box, taken_by
                );
            } else {
                debug!(
                    " >>> previousBoxID -> currentBoxID: {} => {} ({} votes)",
                    c.winner_box, c.query_box, c.votes
                );
                matches.insert(c.winner_box, c.query_box);
            }
        }
        matches
    }
}
