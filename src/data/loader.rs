use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to bring the dataset into memory. Always fatal for the dashboard.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("CSV line {line} has {found} fields, but the header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Process-wide owner of the dataset for one file path.
///
/// The first successful `get_or_load` reads the file; every later call hands
/// out the same `Arc` without touching the file system again. Created by
/// `main` before the UI starts and dropped at exit.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(&self.path)?);
        log::info!(
            "Loaded {} records from {} with columns {:?}",
            dataset.len(),
            self.path.display(),
            dataset.schema.columns
        );
        Ok(Arc::clone(self.cell.get_or_init(|| dataset)))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an earthquake table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – flat columns; dictionaries and narrow integers are
///   normalized on read
/// * anything else      – delimited text with a header row
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        _ => load_csv(path),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse delimited text with a header row. Every cell is type-guessed.
///
/// Rows with fewer fields than the header are padded with nulls; rows with
/// more fields are rejected.
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut cells: Vec<CellValue> = record.iter().map(CellValue::parse).collect();
        cells.resize(headers.len(), CellValue::Null);
        rows.push(cells);
    }

    Dataset::from_rows(headers, rows).map_err(LoadError::MissingColumn)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per attribute.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch
            .columns()
            .iter()
            .map(normalize_column)
            .collect::<Result<Vec<_>, _>>()?;
        for row in 0..batch.num_rows() {
            let cells = columns.iter().map(|col| extract_cell(col, row)).collect();
            rows.push(cells);
        }
    }

    Dataset::from_rows(headers, rows).map_err(LoadError::MissingColumn)
}

/// Cast a column to one of the types `extract_cell` understands.
///
/// Narrow and unsigned integers widen to Int64 (UInt64 goes to Float64 since
/// it may not fit), dictionaries decode to their value type, and any other
/// non-numeric type is rendered as Utf8.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean
        | DataType::Null => Ok(Arc::clone(col)),
        DataType::Int8
        | DataType::Int16
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => cast(col, &DataType::Int64),
        DataType::UInt64
        | DataType::Float16
        | DataType::Decimal128(..)
        | DataType::Decimal256(..) => cast(col, &DataType::Float64),
        DataType::Dictionary(_, value_type) => {
            let decoded = cast(col, value_type)?;
            normalize_column(&decoded)
        }
        _ => cast(col, &DataType::Utf8),
    }
}

/// Extract a single cell from a normalized Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use std::collections::BTreeSet;

    use arrow::array::{DictionaryArray, Float64Array, Int64Array, Int8Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::summary::{summarize, TsunamiTally};

    const SAMPLE_CSV: &str = "\
Magnitude,Depth,Country,Tsunami,Latitude,Longitude
5.0,10,A,0,1.5,2.5
7.2,600,B,1,-3.0,140.0
4.9,5,,0,,
";

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn write_parquet(schema: Arc<Schema>, batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn test_read_csv_typed_fields() {
        let dataset = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.schema.has_tsunami());

        let first = &dataset.records[0];
        assert_eq!(first.magnitude, 5.0);
        assert_eq!(first.depth, 10.0);
        assert_eq!(first.country.as_deref(), Some("A"));
        assert_eq!(first.latitude, Some(1.5));

        let last = &dataset.records[2];
        assert_eq!(last.country, None);
        assert_eq!(last.longitude, None);
        assert_eq!(last.cells.len(), 6);
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_csv("Magnitude,Country\n5.0,A\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Depth")));
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = read_csv("Magnitude,Depth\n5.0,10,extra\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooManyFields {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "Magnitude,Depth,Country\n6.0,10,Chile\n7.0,20\n";
        let dataset = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].country.as_deref(), Some("Chile"));

        let short = &dataset.records[1];
        assert_eq!(short.magnitude, 7.0);
        assert_eq!(short.depth, 20.0);
        assert_eq!(short.country, None);
        assert_eq!(short.cells.len(), 3);
        assert_eq!(short.cells[2], CellValue::Null);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_cache_loads_once() {
        let file = write_temp(".csv", SAMPLE_CSV.as_bytes());
        let cache = DatasetCache::new(file.path());

        let first = cache.get_or_load().unwrap();
        // Later calls must not look at the file again.
        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());

        let second = cache.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_cache_propagates_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().join("missing.csv"));
        assert!(matches!(cache.get_or_load(), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Magnitude", DataType::Float64, true),
            Field::new("Depth", DataType::Float64, false),
            Field::new("Country", DataType::Utf8, true),
            Field::new("Tsunami", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(6.1), None])),
                Arc::new(Float64Array::from(vec![33.0, 70.0])),
                Arc::new(StringArray::from(vec![Some("Japan"), None])),
                Arc::new(Int64Array::from(vec![1, 0])),
            ],
        )
        .unwrap();
        let file = write_parquet(schema, &batch);

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].magnitude, 6.1);
        assert_eq!(dataset.records[0].country.as_deref(), Some("Japan"));
        assert_eq!(dataset.records[0].tsunami, Some(1.0));
        assert!(dataset.records[1].magnitude.is_nan());
        assert_eq!(dataset.records[1].cells[2], CellValue::Null);
        assert_eq!(dataset.records[1].country, None);
    }

    #[test]
    fn test_load_parquet_dictionary_and_narrow_ints() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Magnitude", DataType::Float64, false),
            Field::new("Depth", DataType::Float64, false),
            Field::new(
                "Country",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                false,
            ),
            Field::new("Tsunami", DataType::Int8, false),
        ]));
        let countries: DictionaryArray<Int32Type> = vec!["Japan", "Chile"].into_iter().collect();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![7.0, 8.1])),
                Arc::new(Float64Array::from(vec![30.0, 25.0])),
                Arc::new(countries),
                Arc::new(Int8Array::from(vec![1, 1])),
            ],
        )
        .unwrap();
        let file = write_parquet(schema, &batch);

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.records[0].country.as_deref(), Some("Japan"));
        assert_eq!(dataset.records[1].country.as_deref(), Some("Chile"));
        assert_eq!(dataset.records[0].tsunami, Some(1.0));
        assert_eq!(dataset.records[0].cells[3], CellValue::Integer(1));

        let view = apply(
            &dataset,
            &FilterCriteria {
                min_magnitude: 0.0,
                max_depth: 100.0,
                countries: BTreeSet::new(),
            },
        );
        assert_eq!(summarize(&view).tsunami, TsunamiTally::Count(2.0));
    }
}
