/// Duration, in seconds, that a single fingerprint element covers.
pub const ITEM_DURATION_SECONDS: f64 = 0.128;

/// Converts a fingerprint offset into a timestamp, in seconds.
pub fn offset_to_seconds(offset: usize) -> f64 {
    offset as f64 * ITEM_DURATION_SECONDS
}

/// Action to take against EDL files once an episode's intro changes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum EdlAction {
    /// Do not touch EDL files.
    #[default]
    None,
    /// Write/update an EDL entry for the detected intro.
    Edl,
}

/// Immutable parameters controlling the comparison and selection algorithms.
///
/// Every pure function in this crate (`find_contiguous`, `compare_pair`,
/// `longest_time_range`) takes an `&AnalysisParams` rather than reading from
/// global state, which is what makes those functions trivially testable and
/// safe to call concurrently across seasons.
#[derive(Copy, Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Maximum number of differing bits allowed between two fingerprint
    /// points for them to be considered a match.
    pub maximum_fingerprint_point_differences: u32,
    /// Tolerance, in fingerprint-value units, used when probing the
    /// inverted index for candidate shifts.
    pub inverted_index_shift: i64,
    /// Maximum gap, in seconds, allowed between two consecutive matching
    /// timestamps for them to be considered part of the same contiguous
    /// run.
    pub maximum_time_skip: f64,
    /// Minimum duration, in seconds, a silent region must have to be
    /// eligible as an intro end boundary.
    pub silence_detection_minimum_duration: f64,
    /// Minimum duration, in seconds, an intro candidate must have to be
    /// accepted.
    pub minimum_intro_duration: f64,
    /// Maximum duration, in seconds, an intro candidate may have before the
    /// season analyzer keeps searching for a tighter match.
    pub maximum_intro_duration: f64,
    /// Whether season zero (specials) should be analyzed at all.
    pub analyze_season_zero: bool,
    /// What to do with EDL files once an intro is found or updated.
    pub edl_action: EdlAction,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            maximum_fingerprint_point_differences: 6,
            inverted_index_shift: 2,
            maximum_time_skip: 3.5,
            silence_detection_minimum_duration: 0.33,
            minimum_intro_duration: 15.0,
            maximum_intro_duration: 1200.0,
            analyze_season_zero: false,
            edl_action: EdlAction::None,
        }
    }
}

impl AnalysisParams {
    /// Returns a new [AnalysisParams] with the provided
    /// `maximum_fingerprint_point_differences`.
    pub fn with_maximum_fingerprint_point_differences(mut self, value: u32) -> Self {
        self.maximum_fingerprint_point_differences = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `inverted_index_shift`.
    pub fn with_inverted_index_shift(mut self, value: i64) -> Self {
        self.inverted_index_shift = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `maximum_time_skip`.
    pub fn with_maximum_time_skip(mut self, value: f64) -> Self {
        self.maximum_time_skip = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided
    /// `silence_detection_minimum_duration`.
    pub fn with_silence_detection_minimum_duration(mut self, value: f64) -> Self {
        self.silence_detection_minimum_duration = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `minimum_intro_duration`.
    pub fn with_minimum_intro_duration(mut self, value: f64) -> Self {
        self.minimum_intro_duration = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `maximum_intro_duration`.
    pub fn with_maximum_intro_duration(mut self, value: f64) -> Self {
        self.maximum_intro_duration = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `analyze_season_zero`.
    pub fn with_analyze_season_zero(mut self, value: bool) -> Self {
        self.analyze_season_zero = value;
        self
    }

    /// Returns a new [AnalysisParams] with the provided `edl_action`.
    pub fn with_edl_action(mut self, value: EdlAction) -> Self {
        self.edl_action = value;
        self
    }
}

/// Driver-level configuration. Unlike [AnalysisParams], this is mutable over
/// the lifetime of a [crate::driver::Driver].
#[derive(Debug)]
pub struct Configuration {
    /// Maximum number of seasons analyzed concurrently.
    pub max_parallelism: usize,
    /// One-shot flag: if set, EDL files are regenerated for every episode
    /// touched during the next full pass, regardless of whether its intro
    /// actually changed. Reset to `false` after a full, uncancelled pass.
    pub regenerate_edl_files: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            regenerate_edl_files: false,
        }
    }
}
