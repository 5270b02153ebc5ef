use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};

use super::model::{CellValue, Column, ColumnKind, Table};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// One way of splitting a line into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Pick the delimiter from the file's own line structure.
    Sniffed,
    /// A fixed single-byte delimiter.
    Delimiter(u8),
    /// Any run of spaces and tabs.
    Whitespace,
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Sniffed => write!(f, "auto-detect"),
            Heuristic::Delimiter(b',') => write!(f, "comma"),
            Heuristic::Delimiter(b'\t') => write!(f, "tab"),
            Heuristic::Delimiter(b';') => write!(f, "semicolon"),
            Heuristic::Delimiter(b) => write!(f, "'{}'", *b as char),
            Heuristic::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// Priority order; the first heuristic yielding more than one column wins.
pub const CASCADE: [Heuristic; 5] = [
    Heuristic::Sniffed,
    Heuristic::Delimiter(b','),
    Heuristic::Delimiter(b'\t'),
    Heuristic::Whitespace,
    Heuristic::Delimiter(b';'),
];

const SNIFF_CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];
const SNIFF_LINES: usize = 20;

const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "-NaN", "-nan", "<NA>",
];

/// Load a delimited text file into a [`Table`], trying each delimiter
/// heuristic in [`CASCADE`] order.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    match parse_text(&text) {
        Some((heuristic, table)) => {
            info!(
                "loaded {} with {heuristic} delimiter: {} rows x {} columns",
                path.display(),
                table.len(),
                table.width()
            );
            Ok(table)
        }
        None => Err(LoadError::Unparseable {
            path: path.to_path_buf(),
        }),
    }
}

/// Run the heuristic cascade over in-memory text.
pub fn parse_text(text: &str) -> Option<(Heuristic, Table)> {
    let lines: Vec<&str> = data_lines(text).collect();

    CASCADE.iter().find_map(|&heuristic| match attempt(&lines, heuristic) {
        Ok(table) => Some((heuristic, table)),
        Err(err) => {
            debug!("{heuristic} heuristic rejected: {err:#}");
            None
        }
    })
}

fn attempt(lines: &[&str], heuristic: Heuristic) -> Result<Table> {
    let raw = match heuristic {
        Heuristic::Sniffed => {
            let delimiter = sniff(lines).context("no consistent delimiter found")?;
            debug!("sniffed delimiter {:?}", delimiter as char);
            parse_delimited(lines, delimiter)?
        }
        Heuristic::Delimiter(delimiter) => parse_delimited(lines, delimiter)?,
        Heuristic::Whitespace => parse_whitespace(lines)?,
    };
    raw.into_table()
}

/// Lines carrying data: `#` starts a comment outside quotes, and lines left
/// blank are skipped.
fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(strip_comment)
        .filter(|l| !l.trim().is_empty())
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

// ---------------------------------------------------------------------------
// Delimiter sniffing
// ---------------------------------------------------------------------------

/// A candidate is accepted when it occurs the same non-zero number of times
/// (outside quotes) on every sampled line. Higher counts win, then the
/// candidate order.
fn sniff(lines: &[&str]) -> Option<u8> {
    let sample = &lines[..lines.len().min(SNIFF_LINES)];
    let first = sample.first()?;

    let mut best: Option<(u8, usize)> = None;
    for &candidate in &SNIFF_CANDIDATES {
        let count = count_unquoted(first, candidate);
        if count == 0 {
            continue;
        }
        if sample.iter().any(|l| count_unquoted(l, candidate) != count) {
            continue;
        }
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((candidate, count));
        }
    }
    best.map(|(d, _)| d)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

// ---------------------------------------------------------------------------
// Field splitting
// ---------------------------------------------------------------------------

/// Header plus raw string cells, before typing.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn parse_delimited(lines: &[&str], delimiter: u8) -> Result<RawTable> {
    let body = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "row {row_no}: {} fields but the header has {}",
                record.len(),
                headers.len()
            );
        }
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

fn parse_whitespace(lines: &[&str]) -> Result<RawTable> {
    let (header, body) = lines.split_first().context("no header line")?;
    let headers: Vec<String> = header.split_whitespace().map(str::to_string).collect();

    let mut rows = Vec::with_capacity(body.len());
    for (row_no, line) in body.iter().enumerate() {
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if fields.len() > headers.len() {
            bail!(
                "row {row_no}: {} fields but the header has {}",
                fields.len(),
                headers.len()
            );
        }
        rows.push(fields);
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Header cleanup and type inference
// ---------------------------------------------------------------------------

impl RawTable {
    fn into_table(self) -> Result<Table> {
        let kept: Vec<(usize, &str)> = self
            .headers
            .iter()
            .map(|h| h.trim())
            .enumerate()
            .filter(|(_, h)| !is_artifact_header(h))
            .collect();

        if kept.len() <= 1 {
            bail!("only {} usable column(s)", kept.len());
        }

        let names = dedupe_names(kept.iter().map(|(_, h)| *h));
        let columns = kept
            .iter()
            .zip(names)
            .map(|((idx, _), name)| {
                let cells: Vec<&str> = self
                    .rows
                    .iter()
                    .map(|row| row.get(*idx).map_or("", |v| v.trim()))
                    .collect();
                infer_column(name, &cells)
            })
            .collect();

        Ok(Table::new(columns))
    }
}

/// Empty headers (and Pandas-style `Unnamed: N` placeholders) come from
/// trailing or doubled delimiters.
fn is_artifact_header(h: &str) -> bool {
    h.is_empty()
        || h.strip_prefix("Unnamed: ")
            .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()))
}

fn dedupe_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        while out.contains(&candidate) {
            let n = seen.entry(name.to_string()).or_insert(0);
            *n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick one kind for the whole column, then convert every cell to it.
fn infer_column(name: String, cells: &[&str]) -> Column {
    let present: Vec<&str> = cells.iter().copied().filter(|c| !is_null_token(c)).collect();

    let kind = if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        if present.is_empty() {
            ColumnKind::Float
        } else {
            ColumnKind::Integer
        }
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present.iter().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    };

    let values = cells
        .iter()
        .map(|&c| {
            if is_null_token(c) {
                return CellValue::Null;
            }
            match kind {
                ColumnKind::Integer => c.parse().map_or(CellValue::Null, CellValue::Integer),
                ColumnKind::Float => c.parse().map_or(CellValue::Null, CellValue::Float),
                ColumnKind::Bool => parse_bool(c).map_or(CellValue::Null, CellValue::Bool),
                ColumnKind::Text => CellValue::Text(c.to_string()),
            }
        })
        .collect();

    Column::new(name, kind, values)
}
