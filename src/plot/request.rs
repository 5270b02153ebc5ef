use std::fmt;
use std::path::PathBuf;

use log::info;

use crate::config::PlotSettings;
use crate::data::model::Table;
use crate::error::PlotError;

use super::{pairplot, scatter};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Supplementary statistic drawn on scatter cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationMode {
    #[default]
    None,
    Correlation,
    Regression,
}

impl AnnotationMode {
    pub const ALL: [AnnotationMode; 3] = [
        AnnotationMode::None,
        AnnotationMode::Correlation,
        AnnotationMode::Regression,
    ];
}

impl fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationMode::None => write!(f, "none"),
            AnnotationMode::Correlation => write!(f, "correlation coefficient"),
            AnnotationMode::Regression => write!(f, "regression line"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotKind {
    /// Grid over the given numeric columns.
    Pairplot { columns: Vec<String> },
    /// Grid over every numeric column except `group`, stratified by `group`.
    GroupedPairplot { group: String },
    /// Single scatter panel, optionally stratified and with marginal boxes.
    Scatter {
        x: String,
        y: String,
        group: Option<String>,
        with_boxplot: bool,
    },
}

impl PlotKind {
    /// File-name suffix identifying the plot.
    pub fn suffix(&self) -> String {
        match self {
            PlotKind::Pairplot { .. } => "pairplot".to_string(),
            PlotKind::GroupedPairplot { .. } => "pairplot_colored".to_string(),
            PlotKind::Scatter {
                x,
                y,
                group,
                with_boxplot,
            } => {
                let mut suffix = format!("{x}_vs_{y}");
                if *with_boxplot {
                    suffix.push_str("_with_boxplot");
                }
                if group.is_some() {
                    suffix.push_str("_colored");
                }
                suffix
            }
        }
    }
}

/// Everything one render needs. Consumed by [`PlotRequest::render`].
#[derive(Debug)]
pub struct PlotRequest<'a> {
    pub table: &'a Table,
    pub kind: PlotKind,
    pub annotation: AnnotationMode,
    pub output: PathBuf,
}

impl PlotRequest<'_> {
    /// Draw and save the image, returning its path.
    pub fn render(self, settings: &PlotSettings) -> Result<PathBuf, PlotError> {
        info!("rendering {:?} to {}", self.kind, self.output.display());
        match &self.kind {
            PlotKind::Pairplot { columns } => {
                pairplot::render_basic(self.table, columns, self.annotation, &self.output, settings)?
            }
            PlotKind::GroupedPairplot { group } => {
                pairplot::render_grouped(self.table, group, self.annotation, &self.output, settings)?
            }
            PlotKind::Scatter {
                x,
                y,
                group,
                with_boxplot,
            } => scatter::render(
                self.table,
                &scatter::ScatterSpec {
                    x,
                    y,
                    group: group.as_deref(),
                    with_boxplot: *with_boxplot,
                    annotation: self.annotation,
                },
                &self.output,
                settings,
            )?,
        }
        Ok(self.output)
    }
}
