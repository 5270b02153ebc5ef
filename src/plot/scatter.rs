use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::annotate::Annotation;
use super::canvas::render_png;
use super::draw::{data_range, draw_box, draw_markers, points, Orientation, XyChart};
use super::request::AnnotationMode;
use crate::color::{StyleMap, PLAIN_STYLE};
use crate::config::PlotSettings;
use crate::data::model::{CellValue, Table};
use crate::data::select::{numeric_series, partition_rows, GroupPartition};
use crate::error::PlotError;
use crate::stats::box_summary;

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
/// Box panels span -0.8..0.8 across their value axis.
const BOX_SPAN: Range<f64> = -0.8..0.8;

/// Options for one scatter figure.
#[derive(Debug, Clone, Copy)]
pub struct ScatterSpec<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub group: Option<&'a str>,
    pub with_boxplot: bool,
    pub annotation: AnnotationMode,
}

impl ScatterSpec<'_> {
    fn title(&self) -> String {
        if self.with_boxplot {
            format!("{} vs {} (scatter + box)", self.x, self.y)
        } else {
            format!("{} vs {}", self.x, self.y)
        }
    }
}

/// Scatter of `spec.y` against `spec.x`; with `with_boxplot`, box summaries
/// of x (above) and y (right) share the scatter's axis scales.
pub fn render(
    table: &Table,
    spec: &ScatterSpec<'_>,
    path: &Path,
    settings: &PlotSettings,
) -> Result<(), PlotError> {
    let xs = numeric_series(table, spec.x)?;
    let ys = numeric_series(table, spec.y)?;
    let partition = spec.group.map(|g| partition_rows(table, g)).transpose()?;

    let panel = ScatterPanel {
        spec,
        xs: &xs,
        ys: &ys,
        partition: partition.as_ref(),
        x_range: data_range(&xs),
        y_range: data_range(&ys),
        marker_size: settings.marker_size,
    };

    let size = if spec.with_boxplot {
        settings.scatter_box_size
    } else {
        settings.scatter_size
    };
    render_png(path, size, |root| {
        let body = root.titled(&spec.title(), ("sans-serif", 28))?;
        if spec.with_boxplot {
            panel.draw_with_boxes(&body)
        } else {
            panel.draw_scatter(&body)
        }
    })?;
    info!("scatter of {} vs {} written to {}", spec.x, spec.y, path.display());
    Ok(())
}

struct ScatterPanel<'a> {
    spec: &'a ScatterSpec<'a>,
    xs: &'a [f64],
    ys: &'a [f64],
    partition: Option<&'a GroupPartition>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    marker_size: u32,
}

impl ScatterPanel<'_> {
    fn draw_scatter<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let mut chart = ChartBuilder::on(area)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(self.x_range.clone(), self.y_range.clone())?;
        chart
            .configure_mesh()
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(TRANSPARENT)
            .x_desc(self.spec.x)
            .y_desc(self.spec.y)
            .axis_desc_style(("sans-serif", 20))
            .draw()?;

        self.draw_points(&mut chart)?;

        let annotation = Annotation::compute(self.spec.annotation, self.xs, self.ys);
        if let Some(annotation) = annotation {
            annotation.draw(&mut chart, &self.x_range, &self.y_range)?;
        }
        Ok(())
    }

    fn draw_points<DB: DrawingBackend>(&self, chart: &mut XyChart<'_, DB>) -> Result<(), PlotError> {
        match (self.partition, self.spec.group) {
            (Some(partition), Some(group)) => {
                let values: BTreeSet<CellValue> = partition.keys().cloned().collect();
                let styles = StyleMap::new(group, &values);
                for (value, rows) in partition {
                    let pts = points(self.xs, self.ys, Some(rows.as_slice()));
                    draw_markers(chart, &pts, styles.style_for(value), self.marker_size)?;
                }
            }
            _ => {
                let pts = points(self.xs, self.ys, None);
                draw_markers(chart, &pts, PLAIN_STYLE, self.marker_size)?;
            }
        }
        Ok(())
    }

    /// 3×3 layout with width and height ratios 1 : 4 : 0.5; the scatter sits
    /// in the centre cell.
    fn draw_with_boxes<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let (w, h) = area.dim_in_pixel();
        let split = |len: u32| {
            let unit = len as f64 / 5.5;
            [unit.round() as i32, (unit * 5.0).round() as i32]
        };
        let cells = area.split_by_breakpoints(split(w), split(h));
        let at = |row: usize, col: usize| row * 3 + col;

        self.draw_scatter(&cells[at(1, 1)])?;

        if let Some(summary) = box_summary(self.xs) {
            let mut top = ChartBuilder::on(&cells[at(0, 1)])
                .margin(MARGIN)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(self.x_range.clone(), BOX_SPAN)?;
            draw_box(&mut top, &summary, Orientation::Horizontal)?;
        }
        if let Some(summary) = box_summary(self.ys) {
            let mut right = ChartBuilder::on(&cells[at(1, 2)])
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .build_cartesian_2d(BOX_SPAN, self.y_range.clone())?;
            draw_box(&mut right, &summary, Orientation::Vertical)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_text;
    use tempfile::TempDir;

    const SCENARIO: &str = "a,b,z\n1,2,A\n2,4,A\n3,6,B\n4,8,B\n";

    fn spec<'a>(group: Option<&'a str>, with_boxplot: bool) -> ScatterSpec<'a> {
        ScatterSpec {
            x: "a",
            y: "b",
            group,
            with_boxplot,
            annotation: AnnotationMode::Correlation,
        }
    }

    fn small() -> PlotSettings {
        PlotSettings {
            scatter_size: (400, 300),
            scatter_box_size: (440, 400),
            ..PlotSettings::default()
        }
    }

    #[test]
    fn plain_scatter_uses_scatter_size() {
        let dir = TempDir::new().unwrap();
        let t = parse_text(SCENARIO).unwrap().1;
        let path = dir.path().join("s.png");
        render(&t, &spec(None, false), &path, &small()).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));
    }

    #[test]
    fn grouped_scatter_with_boxes() {
        let dir = TempDir::new().unwrap();
        let t = parse_text(SCENARIO).unwrap().1;
        let path = dir.path().join("sb.png");
        render(&t, &spec(Some("z"), true), &path, &small()).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (440, 400));
    }

    #[test]
    fn non_numeric_axis_is_rejected() {
        let dir = TempDir::new().unwrap();
        let t = parse_text(SCENARIO).unwrap().1;
        let bad = ScatterSpec { y: "z", ..spec(None, false) };
        let err = render(&t, &bad, &dir.path().join("x.png"), &small()).unwrap_err();
        assert!(matches!(err, PlotError::NonNumericColumn(c) if c == "z"));
    }

    #[test]
    fn titles_mention_box_option() {
        assert_eq!(spec(None, true).title(), "a vs b (scatter + box)");
        assert_eq!(spec(None, false).title(), "a vs b");
    }
}
