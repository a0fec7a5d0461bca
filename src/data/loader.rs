use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::schema::Column;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// LogTable – a parsed simulation log
// ---------------------------------------------------------------------------

/// Rows of a whitespace-delimited numeric log, all of the same width.
#[derive(Debug, Clone)]
pub struct LogTable {
    pub path: PathBuf,
    pub width: usize,
    pub rows: Vec<Vec<f64>>,
}

impl LogTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn resolve(&self, column: Column) -> Result<usize> {
        let idx = match column {
            Column::At(i) if i < self.width => Some(i),
            Column::FromEnd(k) if k >= 1 && k <= self.width => Some(self.width - k),
            _ => None,
        };
        idx.ok_or_else(|| Error::ColumnOutOfRange {
            path: self.path.clone(),
            column: column.to_string(),
            width: self.width,
        })
    }

    /// Copy one column out of the table.
    pub fn column(&self, column: Column) -> Result<Vec<f64>> {
        let idx = self.resolve(column)?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Elementwise sum of several columns.
    pub fn column_sum(&self, columns: &[Column]) -> Result<Vec<f64>> {
        let indices = columns
            .iter()
            .map(|c| self.resolve(*c))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).sum())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a simulation log.
///
/// Layout: one sample per line, columns separated by any run of whitespace.
/// * Blank lines and lines starting with `#` are skipped.
/// * Fortran double exponents (`1.0D+03`) are accepted.
/// * A restarted run may switch to a different column count part way
///   through; only rows with the final layout are kept.
pub fn load_log(path: &Path) -> Result<LogTable> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let table = parse_log(path, &text)?;
    debug!(
        "loaded {} ({} rows x {} columns)",
        path.display(),
        table.len(),
        table.width
    );
    Ok(table)
}

fn parse_log(path: &Path, text: &str) -> Result<LogTable> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                parse_number(tok).ok_or_else(|| Error::Parse {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    token: tok.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    let width = match rows.last() {
        Some(last) => last.len(),
        None => return Err(Error::EmptyLog(path.to_path_buf())),
    };

    let total = rows.len();
    rows.retain(|row| row.len() == width);
    if rows.len() != total {
        warn!(
            "{}: column layout changed, dropped {} of {total} rows",
            path.display(),
            total - rows.len()
        );
    }

    Ok(LogTable {
        path: path.to_path_buf(),
        width,
        rows,
    })
}

fn parse_number(tok: &str) -> Option<f64> {
    tok.parse::<f64>().ok().or_else(|| {
        if tok.contains(['D', 'd']) {
            tok.replace(['D', 'd'], "E").parse::<f64>().ok()
        } else {
            None
        }
    })
}
