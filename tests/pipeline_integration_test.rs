use anyhow::Result;
use gpx_multiples::core::ConfigProvider;
use gpx_multiples::{CliConfig, LocalStorage, MultiplesEngine, MultiplesError, SmallMultiplesPipeline};
use std::path::Path;
use tempfile::TempDir;

fn write_gpx(dir: &Path, name: &str, start_lat: f64, with_ele: bool) {
    let mut points = String::new();
    for i in 0..4 {
        let lat = start_lat + i as f64 * 0.001;
        let lon = 7.5 + i as f64 * 0.002;
        if with_ele {
            points.push_str(&format!(
                r#"<trkpt lat="{}" lon="{}"><ele>{}</ele><time>2021-06-01T08:0{}:00Z</time></trkpt>"#,
                lat,
                lon,
                400 + i * 5,
                i
            ));
        } else {
            points.push_str(&format!(r#"<trkpt lat="{}" lon="{}"/>"#, lat, lon));
        }
    }

    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="0.0" lon="0.0"><name>car park</name></wpt>
  <trk><name>{}</name><trkseg>{}</trkseg></trk>
</gpx>"#,
        name, points
    );
    std::fs::write(dir.join(name), doc).unwrap();
}

fn config_for(input: &Path, output: &Path, extra: &[&str]) -> CliConfig {
    use clap::Parser;
    let mut args = vec![
        "gpx-multiples".to_string(),
        input.to_string_lossy().into_owned(),
        "--output-path".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    CliConfig::parse_from(args)
}

async fn run(config: CliConfig) -> gpx_multiples::Result<String> {
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SmallMultiplesPipeline::new(storage, config);
    MultiplesEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_elevation_and_tracks() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    for (i, name) in ["a.gpx", "b.gpx", "c.gpx", "d.gpx", "e.gpx", "f.gpx"]
        .iter()
        .enumerate()
    {
        write_gpx(input.path(), name, 46.0 + i as f64, true);
    }

    let config = config_for(input.path(), output.path(), &["-e", "-t", "--export-csv"]);
    let output_path = run(config).await?;
    assert_eq!(Path::new(&output_path), output.path());

    let elevation = std::fs::read_to_string(output.path().join("elevation.svg"))?;
    let tracks = std::fs::read_to_string(output.path().join("tracks.svg"))?;
    assert_eq!(elevation.matches("<polyline").count(), 6);
    assert_eq!(tracks.matches("<polyline").count(), 6);

    let csv = std::fs::read_to_string(output.path().join("tracks/c.csv"))?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("lat,lon,ele,dist"));
    assert_eq!(lines.next(), Some("48,7.5,400,0"));
    assert_eq!(csv.lines().count(), 5);

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output.path().join("summary.json"))?)?;
    assert_eq!(summary["grid"]["rows"], 2);
    assert_eq!(summary["grid"]["cols"], 4);
    assert_eq!(summary["tracks"].as_array().map(Vec::len), Some(6));
    assert_eq!(summary["tracks"][0]["points"], 4);
    assert!(summary["tracks"][0]["path"]
        .as_str()
        .is_some_and(|p| p.ends_with("a.gpx")));
    assert!(summary["tracks"][0]["distance_km"].as_f64().unwrap() > 0.3);

    Ok(())
}

#[tokio::test]
async fn test_track_mode_does_not_need_elevation() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    for (i, name) in ["1.gpx", "2.gpx", "3.gpx", "4.gpx", "5.gpx"].iter().enumerate() {
        write_gpx(input.path(), name, 40.0 + i as f64, false);
    }

    run(config_for(input.path(), output.path(), &["--tracks"])).await?;

    let tracks = std::fs::read_to_string(output.path().join("tracks.svg"))?;
    assert_eq!(tracks.matches("<polyline").count(), 5);
    assert!(!output.path().join("elevation.svg").exists());
    assert!(!output.path().join("tracks").exists());
    Ok(())
}

#[tokio::test]
async fn test_too_few_files_is_reported_before_parsing() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    for name in ["a.gpx", "b.gpx", "c.gpx"] {
        write_gpx(input.path(), name, 45.0, true);
    }
    // would fail to parse if it were ever read
    std::fs::write(input.path().join("d.gpx"), "<gpx><trk>")?;

    let err = run(config_for(input.path(), output.path(), &["-e"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MultiplesError::InsufficientFiles {
            found: 4,
            required: 5
        }
    ));
    assert!(!output.path().join("summary.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_file_aborts_batch() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    for name in ["a.gpx", "b.gpx", "c.gpx", "d.gpx", "e.gpx"] {
        write_gpx(input.path(), name, 45.0, true);
    }
    std::fs::write(
        input.path().join("c.gpx"),
        r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"><ele>3</ele></trkseg>"#,
    )?;

    let err = run(config_for(input.path(), output.path(), &["-e"]))
        .await
        .unwrap_err();

    match &err {
        MultiplesError::BatchLoad { path, source } => {
            assert!(path.ends_with("c.gpx"));
            assert!(matches!(**source, MultiplesError::Parse { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!output.path().join("elevation.svg").exists());
    Ok(())
}

#[tokio::test]
async fn test_glob_pattern_input() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    for i in 0..5 {
        write_gpx(input.path(), &format!("ride-{}.gpx", i), 50.0, true);
    }
    write_gpx(input.path(), "run-0.gpx", 50.0, true);

    let pattern = input.path().join("ride-*.gpx");
    run(config_for(&pattern, output.path(), &["--min-files", "4"])).await?;

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output.path().join("summary.json"))?)?;
    assert_eq!(summary["tracks"].as_array().map(Vec::len), Some(5));
    assert_eq!(summary["modes"][0], "tracks");
    Ok(())
}
