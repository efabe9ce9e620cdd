use crate::domain::model::{Batch, GridLayout, PlotMode};
use crate::utils::error::{MultiplesError, Result};
use plotters::prelude::*;
use std::ops::Range;

pub const DEFAULT_CELL_SIZE: u32 = 200;

const CELL_MARGIN: u32 = 6;
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// X and Y ranges covering every finite point, padded when a span is zero.
fn bounds(series: &[(f64, f64)]) -> Option<(Range<f64>, Range<f64>)> {
    let mut points = series.iter().filter(|(x, y)| x.is_finite() && y.is_finite());
    let &(x0, y0) = points.next()?;

    let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    Some((padded(x_min, x_max), padded(y_min, y_max)))
}

fn padded(min: f64, max: f64) -> Range<f64> {
    if max > min {
        min..max
    } else {
        let pad = (min.abs() * 1e-6).max(1e-6);
        (min - pad)..(max + pad)
    }
}

/// Draws one undecorated line plot per track into a `rows x cols` SVG grid.
///
/// Cell `layout.cells[i]` shows `batch.tracks()[i]`; cells past the last
/// track, and cells of tracks with nothing to plot in this mode, stay blank.
pub fn render_small_multiples(
    batch: &Batch,
    layout: &GridLayout,
    mode: PlotMode,
    cell_size: u32,
) -> Result<String> {
    if layout.cells.len() != batch.len() {
        return Err(MultiplesError::render(format!(
            "layout has {} cells for {} tracks",
            layout.cells.len(),
            batch.len()
        )));
    }

    let size = (layout.cols as u32 * cell_size, layout.rows as u32 * cell_size);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(MultiplesError::render)?;
        let areas = root.split_evenly((layout.rows, layout.cols));

        for (cell, (path, track)) in layout.cells.iter().zip(batch.iter()) {
            let series: Vec<(f64, f64)> = track
                .series(mode)
                .into_iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();
            let Some((x_range, y_range)) = bounds(&series) else {
                tracing::debug!("Nothing to plot for {} in {} mode", path.display(), mode);
                continue;
            };

            let area = &areas[layout.area_index(*cell)];
            let mut chart = ChartBuilder::on(area)
                .margin(CELL_MARGIN)
                .build_cartesian_2d(x_range, y_range)
                .map_err(MultiplesError::render)?;
            chart
                .draw_series(LineSeries::new(series, &LINE_COLOR))
                .map_err(MultiplesError::render)?;
        }

        root.present().map_err(MultiplesError::render)?;
    }
    Ok(svg)
}
