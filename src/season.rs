use std::collections::HashMap;

use crate::collaborators::{AudioTool, CancellationToken};
use crate::comparator::compare_pair;
use crate::config::AnalysisParams;
use crate::episode::Episode;
use crate::intro::{longest_time_range, SeasonIntros};
use crate::silence::adjust_for_silence;
use crate::{Error, EpisodeId, Result};

/// Outcome of analyzing a single season.
#[derive(Debug)]
pub struct SeasonResult {
    /// Number of episodes in the season (whether or not they were
    /// compared).
    pub episode_count: usize,
    /// Best intro found per episode, after silence adjustment.
    pub intros: SeasonIntros,
    /// Set if the season's analysis was interrupted by cancellation. In
    /// that case `intros` reflects only the comparisons completed before
    /// cancellation was observed.
    pub cancelled: bool,
}

/// Compares every episode of a season against every other episode in the
/// same season and returns the longest shared intro found for each.
///
/// The season is assumed already verified by the caller (file existence,
/// queue membership); this function is a pure(-ish) function of its inputs
/// aside from the external `audio_tool` calls, which keeps it trivially
/// testable and safe to run from multiple worker threads at once, one
/// season per thread.
pub fn analyze(
    season: &[Episode],
    params: &AnalysisParams,
    audio_tool: &dyn AudioTool,
    cancel: &dyn CancellationToken,
) -> Result<SeasonResult> {
    if season.len() <= 1 {
        return Ok(SeasonResult {
            episode_count: season.len(),
            intros: SeasonIntros::new(),
            cancelled: false,
        });
    }

    if season[0].season_number == 0 && !params.analyze_season_zero {
        tracing::debug!(series = %season[0].series_name, "skipping season zero");
        return Ok(SeasonResult {
            episode_count: season.len(),
            intros: SeasonIntros::new(),
            cancelled: false,
        });
    }

    let mut fingerprints: HashMap<EpisodeId, Vec<u32>> = HashMap::with_capacity(season.len());
    for episode in season {
        if cancel.is_cancelled() {
            return Ok(SeasonResult {
                episode_count: season.len(),
                intros: SeasonIntros::new(),
                cancelled: true,
            });
        }

        let fingerprint = match audio_tool.fingerprint(episode) {
            Ok(fp) => fp,
            Err(err) => {
                tracing::warn!(
                    episode = %episode.name,
                    error = %err,
                    "failed to fingerprint episode, treating as unfingerprintable"
                );
                Vec::new()
            }
        };
        fingerprints.insert(episode.id, fingerprint);
    }

    let mut season_intros = SeasonIntros::new();
    let mut queue: Vec<usize> = (0..season.len()).collect();

    while !queue.is_empty() {
        let current_idx = queue.remove(0);
        let current = &season[current_idx];
        let current_fp = fingerprints
            .get(&current.id)
            .ok_or(Error::CacheMiss(current.id))?;

        for &other_idx in &queue {
            let other = &season[other_idx];
            let other_fp = fingerprints
                .get(&other.id)
                .ok_or(Error::CacheMiss(other.id))?;

            if current_fp.is_empty() || other_fp.is_empty() {
                continue;
            }

            let pair = compare_pair(current_fp, other_fp, params);
            let (current_intro, other_intro) =
                longest_time_range(current.id, pair.lhs, other.id, pair.rhs);

            if !current_intro.is_valid() {
                continue;
            }
            if current_intro.duration() > params.maximum_intro_duration {
                continue;
            }

            update_if_longer(&mut season_intros, current_intro);
            update_if_longer(&mut season_intros, other_intro);

            // A valid, within-bounds match was found for `current`: stop
            // scanning the rest of the queue for it.
            break;
        }
    }

    if cancel.is_cancelled() {
        return Ok(SeasonResult {
            episode_count: season.len(),
            intros: SeasonIntros::new(),
            cancelled: true,
        });
    }

    let season_intros = adjust_for_silence(season, season_intros, params, audio_tool);

    Ok(SeasonResult {
        episode_count: season.len(),
        intros: season_intros,
        cancelled: false,
    })
}

fn update_if_longer(intros: &mut SeasonIntros, candidate: crate::intro::Intro) {
    match intros.get(&candidate.episode_id) {
        Some(existing) if existing.duration() >= candidate.duration() => {}
        _ => {
            intros.insert(candidate.episode_id, candidate);
        }
    }
}
