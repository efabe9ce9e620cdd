use crate::core::geodesic::{haversine_distance, round_to_centimeters};
use crate::core::namespace::strip_namespace;
use crate::domain::model::{FieldSet, Track, TrackPoint};
use crate::utils::error::{MultiplesError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
struct PendingPoint {
    lat: f64,
    lon: f64,
}

/// Mutable state threaded through the event loop of one parse.
#[derive(Debug)]
struct ParseState {
    fields: FieldSet,
    pending: Option<PendingPoint>,
    awaiting_ele: bool,
    /// Last point that made it into the track; `None` until the first one.
    previous: Option<TrackPoint>,
    total_distance: f64,
    trkpt_count: usize,
    in_waypoint: bool,
    depth: usize,
    seen_root: bool,
    points: Vec<TrackPoint>,
}

impl ParseState {
    fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            pending: None,
            awaiting_ele: false,
            previous: None,
            total_distance: 0.0,
            trkpt_count: 0,
            in_waypoint: false,
            depth: 0,
            seen_root: false,
            points: Vec::new(),
        }
    }

    fn on_start(&mut self, tag: &str, element: &BytesStart<'_>) -> Result<()> {
        match tag {
            "wpt" => self.in_waypoint = true,
            _ if self.in_waypoint => {}
            "trkpt" => {
                let (lat, lon) = read_coordinates(element)?;
                self.trkpt_count += 1;
                self.awaiting_ele = false;

                if self.fields.elevation {
                    self.pending = Some(PendingPoint { lat, lon });
                } else {
                    self.push(TrackPoint::position(lat, lon));
                }
            }
            "ele" if self.fields.elevation && self.pending.is_some() => {
                self.awaiting_ele = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) -> Result<()> {
        if !self.awaiting_ele {
            return Ok(());
        }
        self.awaiting_ele = false;

        let Some(point) = self.pending.take() else {
            return Ok(());
        };
        let text = text.trim();
        if text.is_empty() {
            tracing::trace!("Dropping track point with empty elevation");
            return Ok(());
        }
        let ele = parse_number("ele", text)?;
        self.complete_with_elevation(point, ele);
        Ok(())
    }

    fn on_end(&mut self, tag: &str) {
        match tag {
            "wpt" => self.in_waypoint = false,
            "ele" if self.awaiting_ele => {
                // <ele> closed without any text
                self.awaiting_ele = false;
                self.pending = None;
            }
            "trkpt" if !self.in_waypoint => {
                self.awaiting_ele = false;
                self.pending = None;
            }
            _ => {}
        }
    }

    fn complete_with_elevation(&mut self, point: PendingPoint, ele: f64) {
        let delta = match self.previous {
            None => 0.0,
            Some(prev) => haversine_distance(prev.lat, prev.lon, point.lat, point.lon),
        };
        self.total_distance = round_to_centimeters(self.total_distance + delta);
        self.push(TrackPoint::with_elevation(
            point.lat,
            point.lon,
            ele,
            self.total_distance,
        ));
    }

    fn push(&mut self, point: TrackPoint) {
        self.previous = Some(point);
        self.points.push(point);
    }

    fn finish(self) -> Result<Track> {
        if !self.seen_root {
            return Err(MultiplesError::parse("no element found"));
        }
        if self.depth != 0 {
            return Err(MultiplesError::parse(format!(
                "unexpected end of document, {} element(s) left open",
                self.depth
            )));
        }

        tracing::debug!(
            "Parsed {} trkpt element(s) into {} point(s)",
            self.trkpt_count,
            self.points.len()
        );
        Ok(Track::new(self.points))
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        MultiplesError::parse(format!("invalid {} value '{}'", field, raw))
    })
}

fn read_coordinates(element: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat = None;
    let mut lon = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| MultiplesError::parse(e.to_string()))?;
        let key = attr.key.local_name();
        let slot = match key.as_ref() {
            b"lat" => &mut lat,
            b"lon" => &mut lon,
            _ => continue,
        };
        let value = attr
            .unescape_value()
            .map_err(|e| MultiplesError::parse(e.to_string()))?;
        *slot = Some(value.into_owned());
    }

    let lat = lat.ok_or_else(|| MultiplesError::missing_field("lat"))?;
    let lon = lon.ok_or_else(|| MultiplesError::missing_field("lon"))?;
    Ok((parse_number("lat", &lat)?, parse_number("lon", &lon)?))
}

fn tag_name(local: &[u8]) -> Result<&str> {
    std::str::from_utf8(local)
        .map(strip_namespace)
        .map_err(|e| MultiplesError::parse(format!("tag name is not UTF-8: {}", e)))
}

/// Streams a GPX document and collects its track points in document order.
///
/// With [`FieldSet::POSITION`] every `trkpt` yields a point. With
/// [`FieldSet::ELEVATION`] only track points carrying non-empty `ele` text do,
/// each with the rounded running distance from the previous kept point.
pub fn parse_reader<R: BufRead>(source: R, fields: FieldSet) -> Result<Track> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::new(fields);
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            MultiplesError::parse(format!(
                "{} (at byte {})",
                e,
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                state.seen_root = true;
                state.depth += 1;
                let local = e.local_name();
                let tag = tag_name(local.as_ref())?;
                state.on_start(tag, &e)?;
            }
            Event::Empty(e) => {
                state.seen_root = true;
                let local = e.local_name();
                let tag = tag_name(local.as_ref())?;
                state.on_start(tag, &e)?;
                state.on_end(tag);
            }
            Event::End(e) => {
                state.depth = state.depth.saturating_sub(1);
                let local = e.local_name();
                let tag = tag_name(local.as_ref())?;
                state.on_end(tag);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| MultiplesError::parse(e.to_string()))?;
                state.on_text(&text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c);
                state.on_text(&text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let track = state.finish()?;
    if fields.elevation {
        tracing::info!("{:.2} km", track.total_distance_km());
    }
    Ok(track)
}

pub fn parse_str(content: &str, fields: FieldSet) -> Result<Track> {
    parse_reader(content.as_bytes(), fields)
}

pub fn parse_file(path: &Path, fields: FieldSet) -> Result<Track> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), fields)
}
