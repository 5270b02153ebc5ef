use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use crate::config::Config;
use crate::data::loader::load_table;
use crate::data::model::Table;
use crate::data::select::{numeric_columns, numeric_series, project};
use crate::error::PlotError;
use crate::paths::{base_name, ensure_output_dir, list_csv_files, output_path};
use crate::plot::{AnnotationMode, PlotKind, PlotRequest};
use crate::stats::CorrelationMatrix;
use crate::ui::prompt::Prompt;
use crate::ui::report;

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pairplot,
    ColoredPairplot,
    Scatter,
}

impl Mode {
    const ALL: [Mode; 3] = [Mode::Pairplot, Mode::ColoredPairplot, Mode::Scatter];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pairplot => write!(f, "Basic pairplot"),
            Mode::ColoredPairplot => write!(f, "Pairplot colored by group"),
            Mode::Scatter => write!(f, "Scatter plot (optionally with box summaries)"),
        }
    }
}

/// A loaded input file.
struct Dataset {
    base: String,
    table: Table,
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// One interactive session: menu, file choice, mode prompts, one render.
pub struct App<R, W> {
    config: Config,
    prompt: Prompt<R, W>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: Config, prompt: Prompt<R, W>) -> Self {
        App { config, prompt }
    }

    /// Run the session and return the path of the written image.
    pub fn run(&mut self) -> Result<PathBuf> {
        let mode = Mode::ALL[self.prompt.choose("Choose plot type:", &Mode::ALL)?];
        info!("mode: {mode}");

        let path = match mode {
            Mode::Pairplot => self.run_pairplot()?,
            Mode::ColoredPairplot => self.run_colored()?,
            Mode::Scatter => self.run_scatter()?,
        };
        report::saved(self.prompt.out(), &path)?;
        Ok(path)
    }

    fn select_dataset(&mut self) -> Result<Dataset> {
        ensure_output_dir(&self.config.output_dir)?;
        let files = list_csv_files(&self.config.data_dir)?;
        if files.is_empty() {
            bail!("no .csv files found in {}", self.config.data_dir.display());
        }

        let labels: Vec<String> = files
            .iter()
            .map(|f| f.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
            .collect();
        let choice = self.prompt.choose("Available CSV files:", &labels)?;
        let path = &files[choice];

        let table = load_table(path)?;
        Ok(Dataset {
            base: base_name(path),
            table,
        })
    }

    fn choose_annotation(&mut self) -> Result<AnnotationMode> {
        let choice = self
            .prompt
            .choose("Annotate scatter panels with:", &AnnotationMode::ALL)?;
        Ok(AnnotationMode::ALL[choice])
    }

    fn render(&self, data: &Dataset, kind: PlotKind, annotation: AnnotationMode) -> Result<PathBuf> {
        let output = output_path(&self.config.output_dir, &data.base, &kind.suffix());
        let request = PlotRequest {
            table: &data.table,
            kind,
            annotation,
            output,
        };
        let path = request
            .render(&self.config.plot)
            .with_context(|| format!("plotting {}", data.base))?;
        Ok(path)
    }

    // ---- Modes ----

    fn run_pairplot(&mut self) -> Result<PathBuf> {
        let data = self.select_dataset()?;
        let columns = numeric_columns(&data.table, &[]);
        if columns.len() < 2 {
            return Err(PlotError::InsufficientColumns {
                required: 2,
                found: columns.len(),
            }
            .into());
        }
        let annotation = self.choose_annotation()?;

        let numeric = project(&data.table, &columns)?;
        report::basic_summary(self.prompt.out(), &data.table, &numeric)?;
        let series = columns
            .iter()
            .map(|c| numeric_series(&data.table, c))
            .collect::<Result<Vec<_>, _>>()?;
        let matrix = CorrelationMatrix::compute(&columns, &series);
        report::correlation_matrix(self.prompt.out(), &matrix)?;

        self.render(&data, PlotKind::Pairplot { columns }, annotation)
    }

    fn run_colored(&mut self) -> Result<PathBuf> {
        let data = self.select_dataset()?;
        let group = self.config.group_column.clone();
        let Some(column) = data.table.column(&group) else {
            return Err(PlotError::MissingColumn(group).into());
        };
        let values = column.unique_values();
        report::grouped_summary(self.prompt.out(), &data.table, &group, &values)?;

        let annotation = self.choose_annotation()?;
        self.render(&data, PlotKind::GroupedPairplot { group }, annotation)
    }

    fn run_scatter(&mut self) -> Result<PathBuf> {
        let data = self.select_dataset()?;
        let group = Some(self.config.group_column.clone()).filter(|g| data.table.has_column(g));

        let exclude: Vec<&str> = group.iter().map(String::as_str).collect();
        let columns = numeric_columns(&data.table, &exclude);
        if columns.len() < 2 {
            return Err(PlotError::InsufficientColumns {
                required: 2,
                found: columns.len(),
            }
            .into());
        }

        let x = columns[self.prompt.choose("Select X variable:", &columns)?].clone();
        let y = columns[self.prompt.choose("Select Y variable:", &columns)?].clone();
        let with_boxplot = self.prompt.confirm("Add box summaries along the margins?")?;
        let annotation = self.choose_annotation()?;

        let values = group
            .as_deref()
            .and_then(|g| data.table.column(g))
            .map(|c| c.unique_values());
        let groups = group.as_deref().zip(values.as_ref());
        report::scatter_summary(self.prompt.out(), &x, &y, groups)?;

        let kind = PlotKind::Scatter {
            x,
            y,
            group,
            with_boxplot,
        };
        self.render(&data, kind, annotation)
    }
}
