use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use crate::data::model::{CellValue, Table};
use crate::stats::CorrelationMatrix;

const RULE: &str = "============================================================";

// ---------------------------------------------------------------------------
// Per-mode summaries
// ---------------------------------------------------------------------------

/// Shape and missing-value counts of the numeric projection used by a
/// basic pairplot.
pub fn basic_summary(out: &mut impl Write, table: &Table, numeric: &Table) -> io::Result<()> {
    let (rows, cols) = table.shape();
    let (n_rows, n_cols) = numeric.shape();
    let missing: usize = numeric.columns().iter().map(|c| c.missing_count()).sum();

    writeln!(out)?;
    writeln!(out, "Numeric columns: {}", numeric.column_names().join(", "))?;
    writeln!(out, "Data shape: {rows} rows x {cols} columns")?;
    writeln!(out, "Numeric data shape: {n_rows} rows x {n_cols} columns")?;
    writeln!(out, "Missing values: {missing}")?;
    Ok(())
}

/// Square matrix with 3-decimal entries; undefined coefficients print `NaN`.
pub fn correlation_matrix(out: &mut impl Write, matrix: &CorrelationMatrix) -> io::Result<()> {
    let width = matrix
        .names
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(6);

    writeln!(out)?;
    writeln!(out, "Correlation matrix:")?;
    write!(out, "{:width$}", "")?;
    for name in &matrix.names {
        write!(out, "  {name:>width$}")?;
    }
    writeln!(out)?;

    for (row, name) in matrix.names.iter().enumerate() {
        write!(out, "{name:<width$}")?;
        for col in 0..matrix.names.len() {
            let r = matrix.get(row, col);
            if r.is_nan() {
                write!(out, "  {:>width$}", "NaN")?;
            } else {
                write!(out, "  {r:>width$.3}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn grouped_summary(
    out: &mut impl Write,
    table: &Table,
    group: &str,
    values: &BTreeSet<CellValue>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Available columns: {}", table.column_names().join(", "))?;
    writeln!(out, "Unique values in '{group}': {}", join(values))?;
    Ok(())
}

pub fn scatter_summary(
    out: &mut impl Write,
    x: &str,
    y: &str,
    groups: Option<(&str, &BTreeSet<CellValue>)>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Plotting {y} against {x}")?;
    if let Some((group, values)) = groups {
        writeln!(out, "Coloured by '{group}': {}", join(values))?;
    }
    Ok(())
}

/// Closing banner naming the written image.
pub fn saved(out: &mut impl Write, path: &Path) -> io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Plot saved as: {name}")?;
    writeln!(out, "Full path: {}", path.display())?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn join(values: &BTreeSet<CellValue>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
