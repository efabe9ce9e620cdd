use crate::domain::model::{RunSummary, Track};
use crate::utils::error::Result;
use std::path::Path;

/// Serializes a track as `lat,lon,ele,dist` CSV; absent fields are empty cells.
pub fn track_to_csv(track: &Track) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // header is written explicitly so empty tracks still get one
    writer.write_record(["lat", "lon", "ele", "dist"])?;
    for point in track.points() {
        writer.write_record(&[
            point.lat.to_string(),
            point.lon.to_string(),
            point.ele.map(|v| v.to_string()).unwrap_or_default(),
            point.dist.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

/// Output name for a track's CSV: `tracks/<file stem>.csv`.
pub fn csv_name(index: usize, source: &Path) -> String {
    match source.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => format!("tracks/{}.csv", stem),
        _ => format!("tracks/track-{:03}.csv", index),
    }
}

pub fn summary_to_json(summary: &RunSummary) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(summary)?)
}
