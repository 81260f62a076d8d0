use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::collaborators::{
    AudioTool, CancellationToken, EdlManager, LibraryManager, PersistentStore, ProgressReporter,
};
use crate::config::{AnalysisParams, Configuration, EdlAction};
use crate::episode::Episode;
use crate::intro::Intro;
use crate::season;
use crate::{Error, EpisodeId, Result};

/// Orchestrates season analysis across the full queue, bounded to
/// `configuration.max_parallelism` concurrent seasons.
///
/// Each worker operates on its own season with a private fingerprint cache;
/// the only state shared between workers is the intro store, which is
/// merged and persisted from inside a single mutex so persistence never
/// observes a torn write (see the concurrency notes on this design).
pub struct Driver<'a> {
    params: AnalysisParams,
    configuration: Mutex<Configuration>,
    audio_tool: &'a dyn AudioTool,
    library_manager: Option<&'a dyn LibraryManager>,
    persistent_store: &'a dyn PersistentStore,
    edl_manager: &'a dyn EdlManager,
    intros: Mutex<HashMap<EpisodeId, Intro>>,
}

impl<'a> Driver<'a> {
    /// Constructs a new [Driver]. `library_manager` is optional so that
    /// attempting to run without one surfaces [Error::InvalidState] rather
    /// than panicking.
    pub fn new(
        params: AnalysisParams,
        configuration: Configuration,
        audio_tool: &'a dyn AudioTool,
        library_manager: Option<&'a dyn LibraryManager>,
        persistent_store: &'a dyn PersistentStore,
        edl_manager: &'a dyn EdlManager,
    ) -> Self {
        Self {
            params,
            configuration: Mutex::new(configuration),
            audio_tool,
            library_manager,
            persistent_store,
            edl_manager,
            intros: Mutex::new(HashMap::new()),
        }
    }

    /// Runs analysis over every queued season, reporting progress and
    /// honoring cancellation. Returns once every season has been attempted
    /// (or cancellation was observed).
    pub fn execute(
        &self,
        progress: &dyn ProgressReporter,
        cancel: &dyn CancellationToken,
    ) -> Result<()> {
        let library_manager = self.library_manager.ok_or(Error::InvalidState)?;
        let seasons = library_manager.queued_seasons();
        if seasons.is_empty() {
            return Err(Error::NoWork);
        }

        let total = seasons.len();
        let processed = AtomicUsize::new(0);

        let run_one = |season: &Vec<Episode>| {
            self.run_season(season, cancel);
            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
            let percent = ((done * 100) / total).min(100) as u8;
            progress.report(percent);
        };

        #[cfg(feature = "rayon")]
        {
            let max_parallelism = self.configuration.lock().unwrap().max_parallelism;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_parallelism)
                .build()
                .map_err(|e| Error::Thread(e.to_string()))?;
            pool.install(|| {
                seasons.par_iter().for_each(run_one);
            });
        }
        #[cfg(not(feature = "rayon"))]
        {
            seasons.iter().for_each(run_one);
        }

        if !cancel.is_cancelled() {
            self.configuration.lock().unwrap().regenerate_edl_files = false;
            self.persistent_store.save_configuration()?;
        }

        Ok(())
    }

    fn run_season(&self, season: &[Episode], cancel: &dyn CancellationToken) {
        let series = season.first().map(|e| e.series_name.clone());
        let season_number = season.first().map(|e| e.season_number);

        let result = match season::analyze(season, &self.params, self.audio_tool, cancel) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    series = ?series,
                    season = ?season_number,
                    error = %err,
                    "abandoning season due to internal error"
                );
                return;
            }
        };

        if result.cancelled || result.intros.is_empty() {
            return;
        }

        self.merge_and_persist(season, result.intros);
    }

    /// Merges a season's intros into the global store and persists the
    /// result, all under a single lock so the store is never observed
    /// half-written.
    fn merge_and_persist(&self, season: &[Episode], season_intros: crate::intro::SeasonIntros) {
        let mut intros = self.intros.lock().unwrap();
        let mut changed_episodes = Vec::new();

        for (id, candidate) in season_intros {
            let is_improvement = match intros.get(&id) {
                Some(existing) => candidate.duration() > existing.duration(),
                None => true,
            };
            if is_improvement {
                intros.insert(id, candidate);
                changed_episodes.push(id);
            }
        }

        if let Err(err) = self.persistent_store.save_timestamps(&intros) {
            tracing::error!(error = %err, "failed to persist intro timestamps");
        }

        let configuration = self.configuration.lock().unwrap();
        let edl_action = self.params.edl_action;
        let force_regenerate = configuration.regenerate_edl_files;
        drop(configuration);

        if edl_action != EdlAction::None && (force_regenerate || !changed_episodes.is_empty()) {
            let touched: Vec<Episode> = season
                .iter()
                .filter(|e| force_regenerate || changed_episodes.contains(&e.id))
                .cloned()
                .collect();
            if let Err(err) = self.edl_manager.update_edl_files(&touched) {
                tracing::error!(error = %err, "failed to update EDL files");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::time_range::TimeRange;

    struct NeverCancel;
    impl CancellationToken for NeverCancel {
        fn is_cancelled(&self) -> bool {
            false
        }
    }

    struct NoOpAudioTool;
    impl AudioTool for NoOpAudioTool {
        fn fingerprint(&self, _episode: &Episode) -> anyhow::Result<Vec<u32>> {
            Ok(Vec::new())
        }
        fn detect_silence(&self, _episode: &Episode, _duration: f64) -> Result<Vec<TimeRange>> {
            Ok(Vec::new())
        }
    }

    struct EmptyLibrary;
    impl LibraryManager for EmptyLibrary {
        fn queued_seasons(&self) -> Vec<Vec<Episode>> {
            Vec::new()
        }
    }

    struct OneSeasonLibrary(Vec<Episode>);
    impl LibraryManager for OneSeasonLibrary {
        fn queued_seasons(&self) -> Vec<Vec<Episode>> {
            vec![self.0.clone()]
        }
    }

    struct RecordingStore {
        saved: Mutex<bool>,
    }
    impl PersistentStore for RecordingStore {
        fn save_timestamps(&self, _intros: &HashMap<EpisodeId, Intro>) -> Result<()> {
            *self.saved.lock().unwrap() = true;
            Ok(())
        }
        fn save_configuration(&self) -> Result<()> {
            Ok(())
        }
    }

    struct NoOpEdl;
    impl EdlManager for NoOpEdl {
        fn update_edl_files(&self, _episodes: &[Episode]) -> Result<()> {
            Ok(())
        }
    }

    struct NoOpProgress;
    impl ProgressReporter for NoOpProgress {
        fn report(&self, _percent: u8) {}
    }

    #[test]
    fn missing_library_manager_is_invalid_state() {
        let tool = NoOpAudioTool;
        let store = RecordingStore {
            saved: Mutex::new(false),
        };
        let edl = NoOpEdl;
        let driver = Driver::new(
            AnalysisParams::default(),
            Configuration::default(),
            &tool,
            None,
            &store,
            &edl,
        );
        let err = driver.execute(&NoOpProgress, &NeverCancel).unwrap_err();
        assert!(matches!(err, Error::InvalidState));
    }

    #[test]
    fn empty_queue_is_no_work() {
        let tool = NoOpAudioTool;
        let library = EmptyLibrary;
        let store = RecordingStore {
            saved: Mutex::new(false),
        };
        let edl = NoOpEdl;
        let driver = Driver::new(
            AnalysisParams::default(),
            Configuration::default(),
            &tool,
            Some(&library),
            &store,
            &edl,
        );
        let err = driver.execute(&NoOpProgress, &NeverCancel).unwrap_err();
        assert!(matches!(err, Error::NoWork));
    }

    #[test]
    fn single_episode_season_completes_without_persisting() {
        let episode = Episode::new(uuid::Uuid::from_bytes([1; 16]), "Show", 1, "E01", "/e.mkv");
        let tool = NoOpAudioTool;
        let library = OneSeasonLibrary(vec![episode]);
        let store = RecordingStore {
            saved: Mutex::new(false),
        };
        let edl = NoOpEdl;
        let driver = Driver::new(
            AnalysisParams::default(),
            Configuration::default(),
            &tool,
            Some(&library),
            &store,
            &edl,
        );
        driver.execute(&NoOpProgress, &NeverCancel).unwrap();
        assert!(!*store.saved.lock().unwrap());
    }

    #[test]
    fn regenerate_flag_resets_after_full_uncancelled_pass() {
        let episode = Episode::new(uuid::Uuid::from_bytes([1; 16]), "Show", 1, "E01", "/e.mkv");
        let tool = NoOpAudioTool;
        let library = OneSeasonLibrary(vec![episode]);
        let store = RecordingStore {
            saved: Mutex::new(false),
        };
        let edl = NoOpEdl;
        let mut configuration = Configuration::default();
        configuration.regenerate_edl_files = true;
        let driver = Driver::new(
            AnalysisParams::default(),
            configuration,
            &tool,
            Some(&library),
            &store,
            &edl,
        );
        driver.execute(&NoOpProgress, &NeverCancel).unwrap();
        assert!(!driver.configuration.lock().unwrap().regenerate_edl_files);
    }

    #[test]
    fn cancelled_run_does_not_reset_regenerate_flag() {
        let episode = Episode::new(uuid::Uuid::from_bytes([1; 16]), "Show", 1, "E01", "/e.mkv");
        let tool = NoOpAudioTool;
        let library = OneSeasonLibrary(vec![episode]);
        let store = RecordingStore {
            saved: Mutex::new(false),
        };
        let edl = NoOpEdl;
        let mut configuration = Configuration::default();
        configuration.regenerate_edl_files = true;
        let driver = Driver::new(
            AnalysisParams::default(),
            configuration,
            &tool,
            Some(&library),
            &store,
            &edl,
        );
        struct AlwaysCancel;
        impl CancellationToken for AlwaysCancel {
            fn is_cancelled(&self) -> bool {
                true
            }
        }
        driver.execute(&NoOpProgress, &AlwaysCancel).unwrap();
        assert!(driver.configuration.lock().unwrap().regenerate_edl_files);
    }
}
