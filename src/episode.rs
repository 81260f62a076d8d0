use std::path::PathBuf;

use crate::EpisodeId;

/// Identity and location of a single episode, as handed to the analyzer by
/// the (out-of-scope) media-library queue.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Episode {
    /// Opaque identifier, stable across runs.
    pub id: EpisodeId,
    /// Name of the series this episode belongs to.
    pub series_name: String,
    /// Season number. Season `0` is conventionally used for specials.
    pub season_number: u32,
    /// Display name of the episode (e.g. "S01E04 - The Pilot").
    pub name: String,
    /// Path to the episode's media file.
    pub path: PathBuf,
}

impl Episode {
    /// Constructs a new [Episode].
    pub fn new(
        id: EpisodeId,
        series_name: impl Into<String>,
        season_number: u32,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id,
            series_name: series_name.into(),
            season_number,
            name: name.into(),
            path: path.into(),
        }
    }
}
