use std::ops::Range;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::color::GroupStyle;
use crate::error::PlotError;
use crate::stats::{BoxSummary, HistogramBins};

/// A chart with plain `f64` axes on both sides.
pub type XyChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Finite min..max of `values`, padded by 5 % on each side. Degenerate
/// inputs are widened so the span is always positive.
pub fn data_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Point at fraction `f` of the way through `range`.
pub fn at_fraction(range: &Range<f64>, f: f64) -> f64 {
    range.start + (range.end - range.start) * f
}

/// `(x, y)` pairs for the given rows, dropping pairs with a missing side.
pub fn points(x: &[f64], y: &[f64], rows: Option<&[usize]>) -> Vec<(f64, f64)> {
    let pair = |i: usize| (x[i], y[i]);
    let keep = |p: &(f64, f64)| p.0.is_finite() && p.1.is_finite();
    match rows {
        Some(rows) => rows.iter().map(|&i| pair(i)).filter(keep).collect(),
        None => (0..x.len().min(y.len())).map(pair).filter(keep).collect(),
    }
}

/// Values of `series` at `rows`, or all of them.
pub fn pick(series: &[f64], rows: Option<&[usize]>) -> Vec<f64> {
    match rows {
        Some(rows) => rows.iter().map(|&i| series[i]).collect(),
        None => series.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Series helpers
// ---------------------------------------------------------------------------

pub fn draw_markers<DB: DrawingBackend>(
    chart: &mut XyChart<'_, DB>,
    points: &[(f64, f64)],
    style: GroupStyle,
    radius: u32,
) -> Result<(), PlotError> {
    chart.draw_series(points.iter().map(|&p| Circle::new(p, radius, style.fill_style())))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, radius, style.edge_style())))?;
    Ok(())
}

pub fn draw_histogram<DB: DrawingBackend>(
    chart: &mut XyChart<'_, DB>,
    bins: &HistogramBins,
    counts: &[usize],
    style: GroupStyle,
) -> Result<(), PlotError> {
    let bars: Vec<[(f64, f64); 2]> = bins
        .edges
        .windows(2)
        .zip(counts)
        .filter(|&(_, &c)| c > 0)
        .map(|(w, &c)| [(w[0], 0.0), (w[1], c as f64)])
        .collect();
    chart.draw_series(bars.iter().map(|&b| Rectangle::new(b, style.fill_style())))?;
    chart.draw_series(bars.iter().map(|&b| Rectangle::new(b, style.edge_style())))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Values run along x; the box is centred on y = 0.
    Horizontal,
    /// Values run along y; the box is centred on x = 0.
    Vertical,
}

/// Box-and-whisker glyph centred on 0 across the value axis.
pub fn draw_box<DB: DrawingBackend>(
    chart: &mut XyChart<'_, DB>,
    summary: &BoxSummary,
    orientation: Orientation,
) -> Result<(), PlotError> {
    const HALF_WIDTH: f64 = 0.25;
    let at = |value: f64, offset: f64| match orientation {
        Orientation::Horizontal => (value, offset),
        Orientation::Vertical => (offset, value),
    };
    let line = BLACK.stroke_width(2);

    let body = [at(summary.q1, -HALF_WIDTH), at(summary.q3, HALF_WIDTH)];
    chart.draw_series(std::iter::once(Rectangle::new(body, WHITE.filled())))?;
    chart.draw_series(std::iter::once(Rectangle::new(body, line)))?;

    let segments = [
        [at(summary.median, -HALF_WIDTH), at(summary.median, HALF_WIDTH)],
        [at(summary.whisker_lo, 0.0), at(summary.q1, 0.0)],
        [at(summary.q3, 0.0), at(summary.whisker_hi, 0.0)],
        [at(summary.whisker_lo, -HALF_WIDTH / 2.0), at(summary.whisker_lo, HALF_WIDTH / 2.0)],
        [at(summary.whisker_hi, -HALF_WIDTH / 2.0), at(summary.whisker_hi, HALF_WIDTH / 2.0)],
    ];
    chart.draw_series(segments.iter().map(|s| PathElement::new(s.to_vec(), line)))?;

    chart.draw_series(
        summary
            .outliers
            .iter()
            .map(|&v| Circle::new(at(v, 0.0), 4, BLACK.stroke_width(1))),
    )?;
    Ok(())
}
