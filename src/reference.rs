//! Minimal reference implementations of the collaborator traits, used by
//! the bundled CLI. These are intentionally simple: real deployments are
//! expected to back these traits with an actual media-library database,
//! a real fingerprinting/silence-detection backend, and so on.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use intro_detect::collaborators::{
    AudioTool, CancellationToken, EdlManager, LibraryManager, PersistentStore, ProgressReporter,
};
use intro_detect::episode::Episode;
use intro_detect::intro::Intro;
use intro_detect::time_range::TimeRange;
use intro_detect::{EpisodeId, Result};

/// Reads fingerprints and silence regions from JSON sidecar files placed
/// next to each episode's media file (`<path>.fingerprint.json` and
/// `<path>.silence.json`).
pub struct SidecarAudioTool;

#[derive(serde::Deserialize)]
struct SilenceSidecar {
    regions: Vec<(f64, f64)>,
}

impl AudioTool for SidecarAudioTool {
    fn fingerprint(&self, episode: &Episode) -> anyhow::Result<Vec<u32>> {
        let sidecar = episode.path.with_extension("fingerprint.json");
        let data = fs::read_to_string(&sidecar)?;
        let fingerprint: Vec<u32> = serde_json::from_str(&data)?;
        Ok(fingerprint)
    }

    fn detect_silence(&self, episode: &Episode, _duration_seconds: f64) -> Result<Vec<TimeRange>> {
        let sidecar = episode.path.with_extension("silence.json");
        if !sidecar.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&sidecar)?;
        let parsed: SilenceSidecar = serde_json::from_str(&data)?;
        Ok(parsed
            .regions
            .into_iter()
            .map(|(start, end)| TimeRange::new(start, end))
            .collect())
    }
}

/// Treats each immediate subdirectory of `root` as a season, and every
/// non-sidecar file within it as an episode.
pub struct DirectoryLibraryManager {
    root: PathBuf,
}

impl DirectoryLibraryManager {
    /// Constructs a [DirectoryLibraryManager] rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn episode_id(path: &Path) -> EpisodeId {
        // Deterministic id derived from the file path, so re-scanning the
        // same library yields stable identifiers across runs.
        let mut bytes = [0u8; 16];
        let mut hash: u64 = 0xcbf29ce484222325;
        for b in path.to_string_lossy().as_bytes() {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        bytes[..8].copy_from_slice(&hash.to_le_bytes());
        bytes[8..].copy_from_slice(&hash.rotate_left(17).to_le_bytes());
        uuid::Uuid::from_bytes(bytes)
    }

    fn is_sidecar(path: &Path) -> bool {
        let name = path.to_string_lossy();
        name.ends_with(".fingerprint.json") || name.ends_with(".silence.json")
    }
}

impl LibraryManager for DirectoryLibraryManager {
    fn queued_seasons(&self) -> Vec<Vec<Episode>> {
        let Ok(series_entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut seasons = Vec::new();
        for series_entry in series_entries.flatten() {
            let series_path = series_entry.path();
            if !series_path.is_dir() {
                continue;
            }
            let series_name = series_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let Ok(season_entries) = fs::read_dir(&series_path) else {
                continue;
            };
            for season_entry in season_entries.flatten() {
                let season_path = season_entry.path();
                if !season_path.is_dir() {
                    continue;
                }
                let season_number = season_path
                    .file_name()
                    .and_then(|n| n.to_string_lossy().trim_start_matches("season-").parse().ok())
                    .unwrap_or(1);

                let Ok(files) = fs::read_dir(&season_path) else {
                    continue;
                };
                let mut episodes: Vec<Episode> = files
                    .flatten()
                    .map(|f| f.path())
                    .filter(|p| p.is_file() && !Self::is_sidecar(p))
                    .map(|path| {
                        let name = path
                            .file_stem()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default();
                        Episode::new(
                            Self::episode_id(&path),
                            series_name.clone(),
                            season_number,
                            name,
                            path,
                        )
                    })
                    .collect();
                episodes.sort_by(|a, b| a.name.cmp(&b.name));
                if !episodes.is_empty() {
                    seasons.push(episodes);
                }
            }
        }
        seasons
    }
}

/// Persists detected intro timestamps as a single JSON file.
pub struct JsonPersistentStore {
    path: PathBuf,
}

impl JsonPersistentStore {
    /// Constructs a [JsonPersistentStore] writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistentStore for JsonPersistentStore {
    fn save_timestamps(&self, intros: &HashMap<EpisodeId, Intro>) -> Result<()> {
        let data = serde_json::to_vec_pretty(intros)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    fn save_configuration(&self) -> Result<()> {
        Ok(())
    }
}

/// Intentional no-op stub: [EdlManager::update_edl_files] is only handed
/// episode identities, not the intro timestamps needed to write a real
/// `start end action` EDL line, so this reference implementation does not
/// write anything. A real deployment backs this trait with a manager that
/// has its own access to the persisted intro store.
pub struct FileEdlManager;

impl EdlManager for FileEdlManager {
    fn update_edl_files(&self, _episodes: &[Episode]) -> Result<()> {
        Ok(())
    }
}

/// Prints progress to stderr.
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, percent: u8) {
        eprintln!("progress: {percent}%");
    }
}

/// A [CancellationToken] that never cancels. Suitable for a one-shot CLI
/// invocation with no interactive cancellation surface.
pub struct NeverCancel;

impl CancellationToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}
