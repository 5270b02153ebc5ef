use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::annotate::{lower_triangle, CellAnnotations};
use super::canvas::render_png;
use super::draw::{data_range, draw_histogram, draw_markers, pick, points, XyChart};
use super::request::AnnotationMode;
use crate::color::{GroupStyle, StyleMap, PLAIN_STYLE};
use crate::config::PlotSettings;
use crate::data::model::{CellValue, Table};
use crate::data::select::{numeric_columns, numeric_series, partition_rows};
use crate::error::PlotError;
use crate::stats::HistogramBins;

const X_LABEL_AREA: u32 = 35;
const Y_LABEL_AREA: u32 = 45;

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Full grid over `columns` (at least two, all numeric).
pub fn render_basic(
    table: &Table,
    columns: &[String],
    annotation: AnnotationMode,
    path: &Path,
    settings: &PlotSettings,
) -> Result<(), PlotError> {
    if columns.len() < 2 {
        return Err(PlotError::InsufficientColumns {
            required: 2,
            found: columns.len(),
        });
    }
    let series = columns
        .iter()
        .map(|c| numeric_series(table, c))
        .collect::<Result<Vec<_>, _>>()?;

    let layers = [Layer {
        style: PLAIN_STYLE,
        rows: None,
    }];
    let grid = PairGrid::new(columns, &series, &layers, annotation);
    grid.render(path, settings)
}

/// Grid over every numeric column except `group`, points and histograms
/// painted per group value. No legend is drawn.
pub fn render_grouped(
    table: &Table,
    group: &str,
    annotation: AnnotationMode,
    path: &Path,
    settings: &PlotSettings,
) -> Result<(), PlotError> {
    let partition = partition_rows(table, group)?;
    let columns = numeric_columns(table, &[group]);
    if columns.is_empty() {
        return Err(PlotError::InsufficientColumns {
            required: 1,
            found: 0,
        });
    }
    let series = columns
        .iter()
        .map(|c| numeric_series(table, c))
        .collect::<Result<Vec<_>, _>>()?;

    let values: BTreeSet<CellValue> = partition.keys().cloned().collect();
    let styles = StyleMap::new(group, &values);
    let layers: Vec<Layer<'_>> = partition
        .iter()
        .map(|(value, rows)| Layer {
            style: styles.style_for(value),
            rows: Some(rows.as_slice()),
        })
        .collect();
    debug!("{} groups in '{}'", styles.len(), styles.column);

    let grid = PairGrid::new(&columns, &series, &layers, annotation);
    grid.render(path, settings)
}

// ---------------------------------------------------------------------------
// Grid model
// ---------------------------------------------------------------------------

/// A subset of rows drawn with one style; `None` means every row.
struct Layer<'a> {
    style: GroupStyle,
    rows: Option<&'a [usize]>,
}

struct PairGrid<'a> {
    names: &'a [String],
    series: &'a [Vec<f64>],
    ranges: Vec<Range<f64>>,
    layers: &'a [Layer<'a>],
    annotations: CellAnnotations,
}

impl<'a> PairGrid<'a> {
    fn new(
        names: &'a [String],
        series: &'a [Vec<f64>],
        layers: &'a [Layer<'a>],
        annotation: AnnotationMode,
    ) -> Self {
        PairGrid {
            names,
            series,
            ranges: series.iter().map(|s| data_range(s)).collect(),
            layers,
            annotations: lower_triangle(annotation, series),
        }
    }

    fn size(&self) -> usize {
        self.names.len()
    }

    fn render(&self, path: &Path, settings: &PlotSettings) -> Result<(), PlotError> {
        let n = self.size();
        let edge = settings.cell_size * n as u32;
        render_png(path, (edge, edge), |root| {
            let cells = Cells::split(root, n);
            for row in 0..n {
                for col in 0..n {
                    self.draw_cell(cells.at(row, col), row, col, settings)?;
                }
            }
            Ok(())
        })?;
        info!("pairplot of {n} columns written to {}", path.display());
        Ok(())
    }

    fn draw_cell<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        row: usize,
        col: usize,
        settings: &PlotSettings,
    ) -> Result<(), PlotError> {
        let n = self.size();
        let x_range = self.ranges[col].clone();

        if row == col {
            let Some(bins) = HistogramBins::for_values(&self.series[col]) else {
                return Ok(());
            };
            let counts: Vec<Vec<usize>> = self
                .layers
                .iter()
                .map(|l| bins.count(&pick(&self.series[col], l.rows)))
                .collect();
            let peak = counts.iter().flatten().copied().max().unwrap_or(0).max(1);
            let x_range = bins.edges[0]..bins.edges[bins.len()];

            let mut chart = ChartBuilder::on(area)
                .margin(6)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(x_range, 0.0..peak as f64 * 1.05)?;
            self.configure_axes(&mut chart, row, col, n)?;
            for (layer, counts) in self.layers.iter().zip(&counts) {
                draw_histogram(&mut chart, &bins, counts, layer.style)?;
            }
            return Ok(());
        }

        let y_range = self.ranges[row].clone();
        let mut chart = ChartBuilder::on(area)
            .margin(6)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(x_range.clone(), y_range.clone())?;
        self.configure_axes(&mut chart, row, col, n)?;

        for layer in self.layers {
            let pts = points(&self.series[col], &self.series[row], layer.rows);
            draw_markers(&mut chart, &pts, layer.style, settings.marker_size)?;
        }
        if let Some(annotation) = self.annotations.get(&(row, col)) {
            annotation.draw(&mut chart, &x_range, &y_range)?;
        }
        Ok(())
    }

    /// Variable names only along the bottom row and the left column.
    fn configure_axes<DB: DrawingBackend>(
        &self,
        chart: &mut XyChart<'_, DB>,
        row: usize,
        col: usize,
        n: usize,
    ) -> Result<(), PlotError> {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(4)
            .y_labels(4)
            .label_style(("sans-serif", 11));
        if row == n - 1 {
            mesh.x_desc(self.names[col].as_str());
        }
        if col == 0 {
            mesh.y_desc(self.names[row].as_str());
        }
        mesh.draw()?;
        Ok(())
    }
}

/// Sub-areas of the figure addressed by `(row, column)`.
struct Cells<DB: DrawingBackend> {
    areas: Vec<DrawingArea<DB, Shift>>,
    n: usize,
}

impl<DB: DrawingBackend> Cells<DB> {
    fn split(root: &DrawingArea<DB, Shift>, n: usize) -> Self {
        Cells {
            areas: root.split_evenly((n, n)),
            n,
        }
    }

    fn at(&self, row: usize, col: usize) -> &DrawingArea<DB, Shift> {
        &self.areas[row * self.n + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_text;
    use tempfile::TempDir;

    const SCENARIO: &str = "a,b,z\n1,2,A\n2,4,A\n3,6,B\n4,8,B\n";

    fn table(text: &str) -> Table {
        parse_text(text).unwrap().1
    }

    fn small() -> PlotSettings {
        PlotSettings {
            cell_size: 120,
            ..PlotSettings::default()
        }
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn one_numeric_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let t = table("a,label\n1,x\n2,y\n");
        let cols = numeric_columns(&t, &[]);
        let err = render_basic(&t, &cols, AnnotationMode::Correlation, &dir.path().join("p.png"), &small())
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::InsufficientColumns { required: 2, found: 1 }
        ));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn two_numeric_columns_write_one_file() {
        let dir = TempDir::new().unwrap();
        let t = table(SCENARIO);
        let cols = numeric_columns(&t, &[]);
        let path = dir.path().join("scenario_pairplot.png");
        render_basic(&t, &cols, AnnotationMode::Correlation, &path, &small()).unwrap();
        assert!(path.is_file());
        assert_eq!(files_in(dir.path()), 1);
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (240, 240));
    }

    #[test]
    fn regression_and_missing_values_render() {
        let dir = TempDir::new().unwrap();
        let t = table("a,b,c\n1,2,5\n2,,5\n3,6,5\n4,8,NA\n");
        let cols = numeric_columns(&t, &[]);
        let path = dir.path().join("gaps.png");
        render_basic(&t, &cols, AnnotationMode::Regression, &path, &small()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn far_outlier_on_the_diagonal_renders() {
        let dir = TempDir::new().unwrap();
        let mut text = String::from("a,b\n");
        for i in 0..100 {
            text.push_str(&format!("{},{}\n", i as f64 / 100.0, i));
        }
        text.push_str("1000000000,100\n");
        let t = table(&text);
        let cols = numeric_columns(&t, &[]);
        let path = dir.path().join("outlier.png");
        render_basic(&t, &cols, AnnotationMode::None, &path, &small()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn grouped_without_group_column_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let t = table("a,b\n1,2\n3,4\n");
        let path = dir.path().join("colored.png");
        let err = render_grouped(&t, "z", AnnotationMode::None, &path, &small()).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(c) if c == "z"));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn grouped_scenario_renders() {
        let dir = TempDir::new().unwrap();
        let t = table(SCENARIO);
        let path = dir.path().join("scenario_pairplot_colored.png");
        render_grouped(&t, "z", AnnotationMode::Correlation, &path, &small()).unwrap();
        // z is text, so the grid is a and b only
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 240);
    }

    #[test]
    fn grouped_numeric_group_column_is_excluded_from_grid() {
        let dir = TempDir::new().unwrap();
        let t = table("a,b,c,z\n1,2,3,0\n2,4,1,1\n3,5,2,2\n4,9,0,0\n");
        let path = dir.path().join("g.png");
        render_grouped(&t, "z", AnnotationMode::Regression, &path, &small()).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 360);
    }
}
