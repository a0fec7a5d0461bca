use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::{frequency_axis, time_axis, FrequencySeries, TaggedArray, TaggedSeries};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Table: one axis, several payload columns
// ---------------------------------------------------------------------------

/// Columns sharing one axis, ready to be written out.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub axis: TaggedArray,
    pub columns: Vec<TaggedArray>,
}

impl Table {
    pub fn new(axis: TaggedArray, columns: Vec<TaggedArray>) -> Result<Self> {
        for c in &columns {
            if c.len() != axis.len() {
                return Err(Error::LengthMismatch {
                    left: c.len(),
                    right: axis.len(),
                });
            }
        }
        Ok(Table { axis, columns })
    }

    /// Series of one accessor call; components share the first one's time.
    pub fn from_series(series: &[TaggedSeries]) -> Result<Self> {
        let axis = match series.first() {
            Some(s) => s.time.clone(),
            None => return Table::new(time_axis(Vec::new()), Vec::new()),
        };
        Table::new(axis, series.iter().map(|s| s.data.clone()).collect())
    }

    pub fn from_spectra(series: &[FrequencySeries]) -> Result<Self> {
        let axis = match series.first() {
            Some(s) => s.frequency.clone(),
            None => return Table::new(frequency_axis(Vec::new()), Vec::new()),
        };
        Table::new(axis, series.iter().map(|s| s.data.clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    fn arrays(&self) -> impl Iterator<Item = &TaggedArray> {
        std::iter::once(&self.axis).chain(&self.columns)
    }

    /// First `rows` rows as an Arrow record batch; unit and label travel as
    /// field metadata.
    pub fn record_batch(&self, rows: Option<usize>) -> Result<RecordBatch> {
        let n = rows.map_or(self.len(), |r| r.min(self.len()));
        let fields: Vec<Field> = self
            .arrays()
            .map(|a| {
                let metadata = HashMap::from([
                    ("unit".to_string(), a.unit.symbol.clone()),
                    ("label".to_string(), a.label.clone()),
                ]);
                Field::new(column_header(a), DataType::Float64, false).with_metadata(metadata)
            })
            .collect();
        let arrays: Vec<ArrayRef> = self
            .arrays()
            .map(|a| Arc::new(Float64Array::from(a.values[..n].to_vec())) as ArrayRef)
            .collect();
        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }

    /// Plain-text table of the first `rows` rows.
    pub fn pretty(&self, rows: Option<usize>) -> Result<String> {
        let batch = self.record_batch(rows)?;
        Ok(arrow::util::pretty::pretty_format_batches(&[batch])?.to_string())
    }
}

/// `name [unit]`.
fn column_header(a: &TaggedArray) -> String {
    if a.unit.symbol.is_empty() {
        a.name.clone()
    } else {
        format!("{} [{}]", a.name, a.unit.symbol)
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write `table` to `path`, format chosen by extension.
///
/// Supported formats:
/// * `.csv`     – header row `name [unit]`, one row per sample
/// * `.json`    – the tagged arrays with all metadata
/// * `.parquet` – one Float64 column per array
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(table, path)?,
        "json" => write_json(table, path)?,
        "parquet" | "pq" => write_parquet(table, path)?,
        other => return Err(Error::not_recognized("output format", other)),
    }
    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.arrays().map(column_header))?;
    for i in 0..table.len() {
        writer.write_record(table.arrays().map(|a| a.values[i].to_string()))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Serialize any value as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(())
}

fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let batch = table.record_batch(None)?;
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    fn table() -> Table {
        let time = time_axis(vec![0.0, 0.5, 1.0]);
        let a = TaggedArray::new(vec![1.0, 2.0, 3.0], Unit::erg(), "E", "$E$");
        let b = TaggedArray::new(vec![0.1, 0.2, 0.3], Unit::dimensionless(), "Ye", "$Y_e$");
        Table::new(time, vec![a, b]).unwrap()
    }

    #[test]
    fn csv_has_unit_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&table(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time [s],E [erg],Ye"));
        assert_eq!(lines.next(), Some("0,1,0.1"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn record_batch_truncates_rows() {
        let batch = table().record_batch(Some(2)).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.schema().field(1).metadata()["unit"], "erg");
    }

    #[test]
    fn parquet_and_json_are_written() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["out.parquet", "out.json"] {
            let path = dir.path().join(name);
            write_table(&table(), &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_table(&table(), &dir.path().join("out.xlsx")).unwrap_err();
        assert!(matches!(err, Error::ComponentNotRecognized { .. }));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let short = TaggedArray::new(vec![1.0], Unit::erg(), "E", "E");
        assert!(Table::new(time_axis(vec![0.0, 1.0]), vec![short]).is_err());
    }
}
