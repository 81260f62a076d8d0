#![deny(missing_docs)]

//! # intro-detect
//!
//! intro-detect finds the recurring opening/intro sequence shared across
//! episodes of the same season, given pre-computed audio fingerprints. It
//! can be used standalone via the bundled CLI, or embedded as a library
//! inside a larger media-management application.
//!
//! The crate deliberately treats media-library enumeration, fingerprint
//! extraction, silence detection, and persistence as external concerns,
//! expressed as the traits in [collaborators]. The core algorithm lives in
//! [comparator], [intro], [season], and [silence].
//!
//! ## Basic usage
//!
//! ```
//! use intro_detect::config::AnalysisParams;
//! use intro_detect::comparator::compare_pair;
//!
//! let lhs: Vec<u32> = vec![1, 2, 3, 4, 5, 6, 7, 8];
//! let rhs = lhs.clone();
//! let params = AnalysisParams::default().with_minimum_intro_duration(0.5);
//! let result = compare_pair(&lhs, &rhs, &params);
//! assert!(!result.lhs.is_empty());
//! ```
//!
//! To run a full season, build an [collaborators::AudioTool] implementation
//! and call [season::analyze] directly, or wire everything (including
//! persistence and EDL regeneration) through [driver::Driver].

/// Population-count utilities used as the fingerprint similarity metric.
pub mod bits;
/// Collaborator trait boundaries for the concerns this crate treats as
/// external (media library, fingerprinting, persistence, EDL, scheduling).
pub mod collaborators;
/// Pairwise fingerprint comparison: shift discovery and contiguity search.
pub mod comparator;
/// Algorithm parameters and driver-level configuration.
pub mod config;
/// Parallel orchestration across a season queue.
pub mod driver;
/// Episode identity and location.
pub mod episode;
/// Inverted fingerprint index.
pub mod index;
/// Detected intro records and the longest-range selector.
pub mod intro;
/// Per-season pairwise analysis.
pub mod season;
/// Silence-based intro end adjustment.
pub mod silence;
/// Synthetic fingerprint builders shared across test modules.
#[cfg(test)]
pub mod testing;
/// Time ranges and contiguous-run search.
pub mod time_range;
/// Common utility functions.
pub mod util;

/// Opaque episode identifier.
pub type EpisodeId = uuid::Uuid;

/// Common error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A fingerprint that should already have been computed for this
    /// episode was missing from the season's cache. Indicates an internal
    /// consistency fault; the season is abandoned when this occurs.
    #[error("missing cached fingerprint for episode {0}")]
    CacheMiss(EpisodeId),
    /// The driver was asked to run without a [collaborators::LibraryManager]
    /// configured.
    #[error("no library manager configured")]
    InvalidState,
    /// The library manager's queue was empty; there is nothing to
    /// fingerprint.
    #[error("no episodes queued for fingerprinting")]
    NoWork,
    /// The worker thread pool could not be built.
    #[error("failed to build worker thread pool: {0}")]
    Thread(String),
    /// Wraps [std::io::Error].
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Wraps [serde_json::Error].
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Wraps [bincode::Error].
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Common result type.
pub type Result<T> = std::result::Result<T, Error>;
