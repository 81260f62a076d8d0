use crate::collaborators::AudioTool;
use crate::config::AnalysisParams;
use crate::episode::Episode;
use crate::intro::SeasonIntros;
use crate::time_range::TimeRange;

/// Shortens each episode's detected `intro_end` to the start of the nearest
/// qualifying silent region, so that the skip boundary lands on natural
/// audio silence instead of mid-dialogue.
///
/// Per-episode failures from the audio tool are logged and leave that
/// episode's intro unchanged; they never abort the season.
pub fn adjust_for_silence(
    season: &[Episode],
    mut intros: SeasonIntros,
    params: &AnalysisParams,
    audio_tool: &dyn AudioTool,
) -> SeasonIntros {
    for episode in season {
        let Some(intro) = intros.get(&episode.id).copied() else {
            continue;
        };

        let silences = match audio_tool.detect_silence(episode, intro.intro_end + 2.0) {
            Ok(silences) => silences,
            Err(err) => {
                tracing::warn!(
                    episode = %episode.name,
                    error = %err,
                    "failed to detect silence, leaving intro end unchanged"
                );
                continue;
            }
        };

        let window = TimeRange::new((intro.intro_end - 15.0).max(0.0), intro.intro_end);

        let snap = silences.iter().find(|silence| {
            silence.intersects(&window)
                && silence.duration() >= params.silence_detection_minimum_duration
                && silence.start >= intro.intro_start
        });

        if let Some(silence) = snap {
            if let Some(entry) = intros.get_mut(&episode.id) {
                entry.intro_end = silence.start;
            }
        }
    }

    intros
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intro::Intro;
    use crate::{EpisodeId, Result};
    use std::collections::HashMap;

    struct FixedSilences(HashMap<EpisodeId, Vec<TimeRange>>);

    impl AudioTool for FixedSilences {
        fn fingerprint(&self, _episode: &Episode) -> anyhow::Result<Vec<u32>> {
            Ok(Vec::new())
        }

        fn detect_silence(&self, episode: &Episode, _duration: f64) -> Result<Vec<TimeRange>> {
            Ok(self.0.get(&episode.id).cloned().unwrap_or_default())
        }
    }

    fn episode(byte: u8) -> Episode {
        Episode::new(uuid::Uuid::from_bytes([byte; 16]), "Show", 1, "E01", "/e.mkv")
    }

    #[test]
    fn snaps_intro_end_to_qualifying_silence() {
        let e = episode(1);
        let mut intros = SeasonIntros::new();
        intros.insert(
            e.id,
            Intro {
                episode_id: e.id,
                intro_start: 0.0,
                intro_end: 80.0,
            },
        );

        let mut silences = HashMap::new();
        silences.insert(e.id, vec![TimeRange::new(78.2, 79.1)]);
        let tool = FixedSilences(silences);

        let params = AnalysisParams::default();
        let result = adjust_for_silence(&[e.clone()], intros, &params, &tool);
        assert_eq!(result[&e.id].intro_end, 78.2);
    }

    #[test]
    fn short_silence_does_not_trigger() {
        let e = episode(1);
        let mut intros = SeasonIntros::new();
        intros.insert(
            e.id,
            Intro {
                episode_id: e.id,
                intro_start: 0.0,
                intro_end: 80.0,
            },
        );

        let mut silences = HashMap::new();
        silences.insert(e.id, vec![TimeRange::new(66.0, 66.1)]);
        let tool = FixedSilences(silences);

        let params = AnalysisParams::default();
        let result = adjust_for_silence(&[e.clone()], intros, &params, &tool);
        assert_eq!(result[&e.id].intro_end, 80.0);
    }

    #[test]
    fn silence_before_intro_start_is_rejected() {
        let e = episode(1);
        let mut intros = SeasonIntros::new();
        intros.insert(
            e.id,
            Intro {
                episode_id: e.id,
                intro_start: 70.0,
                intro_end: 80.0,
            },
        );

        let mut silences = HashMap::new();
        silences.insert(e.id, vec![TimeRange::new(65.0, 66.0)]);
        let tool = FixedSilences(silences);

        let params = AnalysisParams::default();
        let result = adjust_for_silence(&[e.clone()], intros, &params, &tool);
        assert_eq!(result[&e.id].intro_end, 80.0);
    }

    #[test]
    fn episode_without_intro_is_skipped() {
        let e = episode(1);
        let intros = SeasonIntros::new();
        let tool = FixedSilences(HashMap::new());
        let params = AnalysisParams::default();
        let result = adjust_for_silence(&[e.clone()], intros, &params, &tool);
        assert!(result.is_empty());
    }
}
