use std::collections::HashMap;
use std::path::PathBuf;

use crate::episode::Episode;
use crate::intro::Intro;
use crate::time_range::TimeRange;
use crate::{EpisodeId, Result};

/// Produces audio fingerprints and silence regions for an episode.
///
/// Fingerprint extraction and silence detection are explicitly outside the
/// scope of this crate: implementations decode the actual media (e.g. via
/// FFmpeg and a chromaprint-style algorithm) and are supplied by the
/// embedding application.
pub trait AudioTool: Send + Sync {
    /// Returns the fingerprint for `episode`, one `u32` per
    /// [crate::config::ITEM_DURATION_SECONDS] of audio.
    fn fingerprint(&self, episode: &Episode) -> anyhow::Result<Vec<u32>>;

    /// Returns silent regions within `[0, duration_seconds]`, in ascending
    /// start order.
    fn detect_silence(&self, episode: &Episode, duration_seconds: f64) -> Result<Vec<TimeRange>>;
}

/// Resolves an episode id to its file path. Used by the (out-of-scope)
/// media-library queue verifier; declared here for interface completeness.
pub trait EpisodePathResolver: Send + Sync {
    /// Returns the path on disk for `episode_id`, if known.
    fn get_item_path(&self, episode_id: EpisodeId) -> Option<PathBuf>;
}

/// Persists detected intros and the current [crate::config::Configuration].
pub trait PersistentStore: Send + Sync {
    /// Saves the current set of intro timestamps.
    fn save_timestamps(&self, intros: &HashMap<EpisodeId, Intro>) -> Result<()>;

    /// Saves the current driver configuration.
    fn save_configuration(&self) -> Result<()>;
}

/// Regenerates EDL (edit decision list) sidecar files for a set of episodes.
pub trait EdlManager: Send + Sync {
    /// Writes/updates EDL files for `episodes`.
    fn update_edl_files(&self, episodes: &[Episode]) -> Result<()>;
}

/// Enumerates the seasons queued for analysis.
///
/// Stands in for media-library enumeration and queue population, which are
/// explicitly out of scope for this crate.
pub trait LibraryManager: Send + Sync {
    /// Returns one `Vec<Episode>` per queued season.
    fn queued_seasons(&self) -> Vec<Vec<Episode>>;
}

/// Reports overall analysis progress.
pub trait ProgressReporter: Send + Sync {
    /// Reports progress as a percentage in `[0, 100]`.
    fn report(&self, percent: u8);
}

/// Cooperative cancellation signal, polled between the driver's suspension
/// points.
pub trait CancellationToken: Send + Sync {
    /// Returns `true` once cancellation has been requested.
    fn is_cancelled(&self) -> bool;
}
