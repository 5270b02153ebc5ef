use std::collections::BTreeMap;
use std::ops::Range;

use log::debug;
use plotters::prelude::*;

use super::draw::{at_fraction, XyChart};
use super::request::AnnotationMode;
use crate::error::PlotError;
use crate::stats::{linear_fit, Correlation, LinearFit};

/// What gets overlaid on one scatter cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    Label(Correlation),
    Line(LinearFit),
}

impl Annotation {
    /// Annotation for `y` against `x`. Degenerate statistics give the
    /// "N/A" label or no line, never an error.
    pub fn compute(mode: AnnotationMode, x: &[f64], y: &[f64]) -> Option<Self> {
        match mode {
            AnnotationMode::None => None,
            AnnotationMode::Correlation => Some(Annotation::Label(Correlation::between(x, y))),
            AnnotationMode::Regression => linear_fit(x, y).map(Annotation::Line),
        }
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        chart: &mut XyChart<'_, DB>,
        x_range: &Range<f64>,
        y_range: &Range<f64>,
    ) -> Result<(), PlotError> {
        match self {
            Annotation::Label(r) => {
                let pos = (at_fraction(x_range, 0.2), at_fraction(y_range, 0.5));
                chart.draw_series(std::iter::once(Text::new(
                    r.to_string(),
                    pos,
                    ("sans-serif", 16).into_font(),
                )))?;
            }
            Annotation::Line(fit) => {
                chart.draw_series(LineSeries::new(fit.endpoints(), BLACK.stroke_width(2)))?;
            }
        }
        Ok(())
    }
}

/// Annotations keyed by `(row, column)` grid coordinates.
pub type CellAnnotations = BTreeMap<(usize, usize), Annotation>;

/// One annotation per lower-triangle cell of an n×n grid, where cell
/// `(row, col)` plots `series[col]` on x against `series[row]` on y.
pub fn lower_triangle(mode: AnnotationMode, series: &[Vec<f64>]) -> CellAnnotations {
    let mut cells = CellAnnotations::new();
    for row in 0..series.len() {
        for col in 0..row {
            if let Some(a) = Annotation::compute(mode, &series[col], &series[row]) {
                debug!("cell ({row}, {col}): {a:?}");
                cells.insert((row, col), a);
            }
        }
    }
    cells
}
