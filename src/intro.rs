use std::collections::HashMap;

use crate::time_range::TimeRange;
use crate::EpisodeId;

/// Threshold, in seconds, below which a detected intro start is snapped to 0.
const SNAP_TO_ZERO_THRESHOLD: f64 = 5.0;

/// A detected intro for a single episode.
#[derive(Copy, Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Intro {
    /// The episode this intro belongs to.
    pub episode_id: EpisodeId,
    /// Start of the intro, in seconds.
    pub intro_start: f64,
    /// End of the intro, in seconds.
    pub intro_end: f64,
}

impl Intro {
    /// Constructs a default (zero-duration) intro for `episode_id`.
    pub fn default_for(episode_id: EpisodeId) -> Self {
        Self {
            episode_id,
            intro_start: 0.0,
            intro_end: 0.0,
        }
    }

    /// Duration of the intro, in seconds.
    pub fn duration(&self) -> f64 {
        self.intro_end - self.intro_start
    }

    /// A valid intro has a strictly positive duration.
    pub fn is_valid(&self) -> bool {
        self.intro_end > self.intro_start
    }
}

/// Per-episode best intro found so far during a single season run.
pub type SeasonIntros = HashMap<EpisodeId, Intro>;

/// Picks the longest candidate range for each side of a pair comparison and
/// wraps the result as [Intro] records.
///
/// `lhs_ranges` and `rhs_ranges` are sorted independently by descending
/// duration and only the first (longest) range of each is kept. This means
/// the chosen LHS and RHS ranges may come from different candidate shifts --
/// that mismatch is an intentional, preserved property of this selector, not
/// a bug (see the design notes on independent sorting).
pub fn longest_time_range(
    lhs_id: EpisodeId,
    mut lhs_ranges: Vec<TimeRange>,
    rhs_id: EpisodeId,
    mut rhs_ranges: Vec<TimeRange>,
) -> (Intro, Intro) {
    if lhs_ranges.is_empty() || rhs_ranges.is_empty() {
        return (Intro::default_for(lhs_id), Intro::default_for(rhs_id));
    }

    lhs_ranges.sort();
    rhs_ranges.sort();

    let lhs = snap_to_intro(lhs_id, lhs_ranges[0]);
    let rhs = snap_to_intro(rhs_id, rhs_ranges[0]);

    (lhs, rhs)
}

fn snap_to_intro(episode_id: EpisodeId, mut range: TimeRange) -> Intro {
    if range.start <= SNAP_TO_ZERO_THRESHOLD {
        range.start = 0.0;
    }
    Intro {
        episode_id,
        intro_start: range.start,
        intro_end: range.end,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(byte: u8) -> EpisodeId {
        uuid::Uuid::from_bytes([byte; 16])
    }

    #[test]
    fn empty_ranges_yield_default_intros() {
        let (lhs, rhs) = longest_time_range(id(1), vec![], id(2), vec![TimeRange::new(0.0, 20.0)]);
        assert!(!lhs.is_valid());
        assert!(!rhs.is_valid());
    }

    #[test]
    fn picks_longest_and_snaps_near_zero_start() {
        let (lhs, rhs) = longest_time_range(
            id(1),
            vec![TimeRange::new(10.0, 20.0), TimeRange::new(3.0, 40.0)],
            id(2),
            vec![TimeRange::new(0.0, 15.0)],
        );
        assert_eq!(lhs.intro_start, 0.0);
        assert_eq!(lhs.intro_end, 40.0);
        assert_eq!(rhs.intro_start, 0.0);
        assert_eq!(rhs.intro_end, 15.0);
    }

    #[test]
    fn start_above_threshold_is_not_snapped() {
        let (lhs, _) = longest_time_range(
            id(1),
            vec![TimeRange::new(12.8, 39.3)],
            id(2),
            vec![TimeRange::new(38.4, 64.9)],
        );
        assert_eq!(lhs.intro_start, 12.8);
    }
}
