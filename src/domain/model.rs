use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::geodesic::round_to_centimeters;
use crate::utils::error::{MultiplesError, Result};

/// One sample along a recorded path.
///
/// `ele` and `dist` are filled together when the track was parsed in
/// elevation mode and are both `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub dist: Option<f64>,
}

impl TrackPoint {
    pub fn position(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            dist: None,
        }
    }

    pub fn with_elevation(lat: f64, lon: f64, ele: f64, dist: f64) -> Self {
        Self {
            lat,
            lon,
            ele: Some(ele),
            dist: Some(dist),
        }
    }

    /// The (x, y) pair plotted for this point, if the mode's fields are present.
    pub fn series_value(&self, mode: PlotMode) -> Option<(f64, f64)> {
        match mode {
            PlotMode::Tracks => Some((self.lon, self.lat)),
            PlotMode::Elevation => Some((self.dist?, self.ele?)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_distance_m(&self) -> f64 {
        self.points.last().and_then(|p| p.dist).unwrap_or(0.0)
    }

    pub fn total_distance_km(&self) -> f64 {
        round_to_centimeters(self.total_distance_m() / 1000.0)
    }

    pub fn series(&self, mode: PlotMode) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.series_value(mode))
            .collect()
    }
}

/// Tracks paired with the paths they were parsed from, in input order.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    paths: Vec<PathBuf>,
    tracks: Vec<Track>,
}

impl Batch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            paths: Vec::with_capacity(capacity),
            tracks: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, path: PathBuf, track: Track) {
        self.paths.push(path);
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Track)> {
        self.paths
            .iter()
            .map(PathBuf::as_path)
            .zip(self.tracks.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major index of a cell within `rows x cols` drawing areas.
    pub fn area_index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }
}

/// Which fields the track parser extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    pub elevation: bool,
}

impl FieldSet {
    pub const POSITION: FieldSet = FieldSet { elevation: false };
    pub const ELEVATION: FieldSet = FieldSet { elevation: true };

    /// Builds a field set from column names (`lat`, `lon`, `ele`, `dist`).
    pub fn from_names(names: &[&str]) -> Result<Self> {
        for required in ["lat", "lon"] {
            if !names.contains(&required) {
                return Err(MultiplesError::MissingConfigError {
                    field: format!("fields.{}", required),
                });
            }
        }

        let mut elevation = false;
        for name in names {
            match *name {
                "lat" | "lon" => {}
                "ele" | "dist" => elevation = true,
                other => {
                    return Err(MultiplesError::InvalidConfigValueError {
                        field: "fields".to_string(),
                        value: other.to_string(),
                        reason: "Supported fields are lat, lon, ele, dist".to_string(),
                    })
                }
            }
        }
        Ok(Self { elevation })
    }

    pub fn for_modes(modes: &[PlotMode]) -> Self {
        if modes.contains(&PlotMode::Elevation) {
            Self::ELEVATION
        } else {
            Self::POSITION
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    Tracks,
    Elevation,
}

impl PlotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotMode::Tracks => "tracks",
            PlotMode::Elevation => "elevation",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.svg", self.as_str())
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracks" | "track" => Ok(PlotMode::Tracks),
            "elevation" | "ele" => Ok(PlotMode::Elevation),
            other => Err(format!(
                "Unknown plot mode '{}'. Valid modes: tracks, elevation",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub path: PathBuf,
    pub points: usize,
    pub distance_km: f64,
}

/// Result of the transform phase, handed to load.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub batch: Batch,
    pub layout: GridLayout,
    pub summaries: Vec<TrackSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub modes: Vec<PlotMode>,
    pub grid: GridLayout,
    pub tracks: Vec<TrackSummary>,
}
