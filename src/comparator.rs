use std::collections::HashSet;

use crate::bits::popcount;
use crate::config::{offset_to_seconds, AnalysisParams};
use crate::index::build_inverted_index;
use crate::time_range::{find_contiguous, TimeRange};

/// Result of comparing two fingerprint streams: one candidate `TimeRange`
/// pair per surviving shift, aligned by index (`lhs[i]` corresponds to
/// `rhs[i]`).
#[derive(Debug, Default)]
pub struct PairResult {
    /// Candidate ranges within the LHS stream.
    pub lhs: Vec<TimeRange>,
    /// Candidate ranges within the RHS stream, one per entry in `lhs`.
    pub rhs: Vec<TimeRange>,
}

/// Compares two fingerprint streams and returns every candidate shared
/// region discovered across all shifts considered plausible by the inverted
/// index probe.
///
/// This is the core matching routine: it discovers candidate alignment
/// shifts via the inverted index, scores each shift with a Hamming-distance
/// threshold over XORed fingerprint points, and applies the end-trim
/// heuristic to compensate for `find_contiguous` over-extending past the
/// true intro boundary.
pub fn compare_pair(lhs: &[u32], rhs: &[u32], params: &AnalysisParams) -> PairResult {
    let lhs_index = build_inverted_index(lhs);
    let rhs_index = build_inverted_index(rhs);

    let shifts = candidate_shifts(&lhs_index, &rhs_index, params.inverted_index_shift);

    let mut result = PairResult::default();
    for shift in shifts {
        if let Some((lhs_range, rhs_range)) = compare_at_shift(lhs, rhs, shift, params) {
            result.lhs.push(lhs_range);
            result.rhs.push(rhs_range);
        }
    }
    result
}

/// Enumerates every integer shift implied by probing, for each key in
/// `lhs_index`, the neighborhood `[value - shift, value + shift]` in
/// `rhs_index`.
fn candidate_shifts(
    lhs_index: &crate::index::InvertedIndex,
    rhs_index: &crate::index::InvertedIndex,
    shift: i64,
) -> HashSet<i64> {
    let mut shifts = HashSet::new();
    for (&value, &lhs_offset) in lhs_index {
        for delta in -shift..=shift {
            let probe = value as i64 + delta;
            if !(0..=u32::MAX as i64).contains(&probe) {
                continue;
            }
            if let Some(&rhs_offset) = rhs_index.get(&(probe as u32)) {
                shifts.insert(rhs_offset as i64 - lhs_offset as i64);
            }
        }
    }
    shifts
}

/// Scores a single alignment shift via an XOR scan, and returns the trimmed
/// `(lhs, rhs)` range pair if the match is long enough and accepted.
fn compare_at_shift(
    lhs: &[u32],
    rhs: &[u32],
    shift: i64,
    params: &AnalysisParams,
) -> Option<(TimeRange, TimeRange)> {
    let left_offset = if shift < 0 { (-shift) as usize } else { 0 };
    let right_offset = if shift > 0 { shift as usize } else { 0 };

    let overlap = (lhs.len().min(rhs.len()) as i64) - shift.abs();
    if overlap <= 0 {
        return None;
    }
    let overlap = overlap as usize;

    let mut lhs_times = Vec::new();
    let mut rhs_times = Vec::new();
    for i in 0..overlap {
        let diff = lhs[i + left_offset] ^ rhs[i + right_offset];
        if popcount(diff) <= params.maximum_fingerprint_point_differences {
            lhs_times.push(offset_to_seconds(i + left_offset));
            rhs_times.push(offset_to_seconds(i + right_offset));
        }
    }

    let lhs_range = find_contiguous(&lhs_times, params.maximum_time_skip)?;
    if lhs_range.duration() < params.minimum_intro_duration {
        return None;
    }
    let rhs_range = find_contiguous(&rhs_times, params.maximum_time_skip)?;

    Some((trim_end(lhs_range, params), trim_end(rhs_range, params)))
}

/// Shortens the end of `range` to compensate for `find_contiguous` extending
/// past the true boundary of a match. The start is never touched.
fn trim_end(range: TimeRange, params: &AnalysisParams) -> TimeRange {
    let duration = range.duration();
    let trim = if duration >= 90.0 {
        2.0 * params.maximum_time_skip
    } else if duration >= 30.0 {
        params.maximum_time_skip
    } else {
        0.0
    };
    let end = (range.end - trim).max(range.start);
    TimeRange::new(range.start, end)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::AnalysisParams;
    use crate::testing::synthetic_stream;

    #[test]
    fn identical_streams_yield_full_overlap_intro() {
        let stream = synthetic_stream(1000, 1);
        let params = AnalysisParams::default();
        let result = compare_pair(&stream, &stream, &params);

        assert!(!result.lhs.is_empty());
        let best = result
            .lhs
            .iter()
            .zip(&result.rhs)
            .max_by(|a, b| a.0.duration().total_cmp(&b.0.duration()))
            .unwrap();
        // Full stream is 1000 * 0.128 = 128s; >= 90s duration trims 2*3.5=7s.
        assert!((best.0.end - 121.0).abs() < 1e-6);
        assert_eq!(best.0.start, 0.0);
    }

    #[test]
    fn disjoint_streams_yield_no_long_match() {
        let lhs = synthetic_stream(500, 1);
        let rhs = synthetic_stream(500, 42);
        let params = AnalysisParams::default();
        let result = compare_pair(&lhs, &rhs, &params);
        for range in &result.lhs {
            assert!(range.duration() >= params.minimum_intro_duration);
        }
    }

    #[test]
    fn shared_opening_inside_longer_streams() {
        let shared = synthetic_stream(235, 7); // ~30.08s
        let mut lhs = synthetic_stream(100, 1);
        lhs.extend_from_slice(&shared);
        lhs.extend(synthetic_stream(200, 2));

        let mut rhs = synthetic_stream(300, 3);
        rhs.extend_from_slice(&shared);
        rhs.extend(synthetic_stream(50, 4));

        let params = AnalysisParams::default();
        let result = compare_pair(&lhs, &rhs, &params);

        let found = result
            .lhs
            .iter()
            .zip(&result.rhs)
            .find(|(l, _)| (l.start - 12.8).abs() < 0.2);
        assert!(found.is_some(), "expected a match near offset 100 (12.8s)");
    }

    #[test]
    fn noisy_match_within_threshold_still_found() {
        let mut shared_lhs = synthetic_stream(235, 7);
        let shared_rhs: Vec<u32> = shared_lhs
            .iter()
            .enumerate()
            .map(|(i, &v)| v ^ ((i as u32 % 5) + 1))
            .collect();

        let mut lhs = synthetic_stream(50, 1);
        lhs.append(&mut shared_lhs);

        let mut rhs = synthetic_stream(50, 9);
        rhs.extend_from_slice(&shared_rhs);

        let mut params = AnalysisParams::default();
        params.maximum_fingerprint_point_differences = 6;
        let result = compare_pair(&lhs, &rhs, &params);
        assert!(!result.lhs.is_empty());
    }
}
