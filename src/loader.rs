//! CSV loading into a raw, untyped dataset.
//!
//! Every column is read as text so that no value is coerced or rejected at
//! load time. Type decisions (dates, numbers) are made later, column by
//! column, by the analysis steps that need them.

use crate::constants::{DUPLICATE_HEADER_INFIX, IN_MEMORY_SOURCE, MISSING_VALUE_TOKENS};
use crate::error::LoadError;
use polars::prelude::*;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// Tabular data exactly as it appeared in the source, one text column per header
#[derive(Debug, Clone)]
pub struct RawDataset {
    frame: DataFrame,
    source_name: String,
}

impl RawDataset {
    /// Wrap an already materialized frame
    pub fn from_frame(frame: DataFrame, source_name: impl Into<String>) -> Self {
        Self {
            frame,
            source_name: source_name.into(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// How many extra times `name` appeared in the header. Only the first
    /// occurrence keeps the name; the reader renames the rest.
    pub fn duplicate_count(&self, name: &str) -> usize {
        let prefix = format!("{}{}", name, DUPLICATE_HEADER_INFIX);
        self.frame
            .get_column_names()
            .iter()
            .filter(|column| {
                column
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .count()
    }

    /// Column values as text, or `None` when the column is absent
    pub fn text_column(&self, name: &str) -> PolarsResult<Option<StringChunked>> {
        let Ok(column) = self.frame.column(name) else {
            return Ok(None);
        };
        let series = column.as_materialized_series().cast(&DataType::String)?;
        Ok(Some(series.str()?.clone()))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }
}

fn csv_options() -> CsvReadOptions {
    let missing: Vec<PlSmallStr> = MISSING_VALUE_TOKENS
        .iter()
        .map(|token| PlSmallStr::from(*token))
        .collect();

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .map_parse_options(move |options| {
            options.with_null_values(Some(NullValues::AllColumns(missing.clone())))
        })
}

/// Drop rows in which every cell is missing, such as blank lines
fn drop_blank_rows(frame: DataFrame) -> PolarsResult<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), false, frame.height());
    for column in frame.get_columns() {
        keep = &keep | &column.as_materialized_series().is_not_null();
    }

    if keep.all() {
        return Ok(frame);
    }
    frame.filter(&keep)
}

/// Load a CSV file from disk. The file handle is released before returning.
pub fn load_path(path: &Path) -> Result<RawDataset, LoadError> {
    let source_name = path.display().to_string();

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::malformed(source_name.clone(), e),
    })?;

    let metadata = file
        .metadata()
        .map_err(|e| LoadError::malformed(source_name.clone(), e))?;
    if metadata.is_dir() {
        return Err(LoadError::malformed(
            source_name,
            format!("{} is a directory", path.display()),
        ));
    }
    if metadata.len() == 0 {
        return Err(LoadError::empty(source_name));
    }

    debug!("Reading {} ({} bytes)", source_name, metadata.len());
    let frame = csv_options()
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| classify_polars_error(&source_name, e))?;

    into_dataset(frame, source_name)
}

/// Load CSV content held in memory
pub fn load_bytes(bytes: &[u8]) -> Result<RawDataset, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::empty(IN_MEMORY_SOURCE));
    }

    debug!("Reading in-memory CSV ({} bytes)", bytes.len());
    let frame = csv_options()
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| classify_polars_error(IN_MEMORY_SOURCE, e))?;

    into_dataset(frame, IN_MEMORY_SOURCE.to_string())
}

/// Load CSV content from a stream, buffering it fully first
pub fn load_reader(mut reader: impl Read) -> Result<RawDataset, LoadError> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| LoadError::malformed(IN_MEMORY_SOURCE, e))?;
    load_bytes(&buffer)
}

fn classify_polars_error(source_name: &str, error: PolarsError) -> LoadError {
    match error {
        PolarsError::NoData(_) => LoadError::empty(source_name),
        other => LoadError::malformed(source_name, other),
    }
}

fn into_dataset(frame: DataFrame, source_name: String) -> Result<RawDataset, LoadError> {
    let read_rows = frame.height();
    let frame =
        drop_blank_rows(frame).map_err(|e| LoadError::malformed(source_name.clone(), e))?;
    if frame.height() < read_rows {
        debug!(
            "Skipped {} blank rows in {}",
            read_rows - frame.height(),
            source_name
        );
    }

    if frame.width() == 0 || frame.height() == 0 {
        debug!(
            "{} has {} columns and no data rows",
            source_name,
            frame.width()
        );
        return Err(LoadError::empty(source_name));
    }

    debug!(
        "Loaded {}: {} rows, columns {:?}",
        source_name,
        frame.height(),
        frame.get_column_names()
    );
    Ok(RawDataset::from_frame(frame, source_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_bytes_reads_every_column_as_text() {
        let dataset = load_bytes(b"event_type,attendance\nConcert,10\nWorkshop,20\n").unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_names(), vec!["event_type", "attendance"]);
        assert_eq!(
            dataset.frame().column("attendance").unwrap().dtype(),
            &DataType::String
        );

        let attendance = dataset.text_column("attendance").unwrap().unwrap();
        let values: Vec<Option<&str>> = (&attendance).into_iter().collect();
        assert_eq!(values, vec![Some("10"), Some("20")]);
    }

    #[test]
    fn test_text_column_absent_is_none() {
        let dataset = load_bytes(b"event_type\nConcert\n").unwrap();
        assert!(!dataset.has_column("location"));
        assert!(dataset.text_column("location").unwrap().is_none());
    }

    #[test]
    fn test_empty_cells_become_nulls() {
        let dataset = load_bytes(b"event_type,location\nConcert,\n,Hall\n").unwrap();
        let location = dataset.text_column("location").unwrap().unwrap();
        assert_eq!(location.null_count(), 1);
    }

    #[test]
    fn test_missing_value_tokens_become_nulls() {
        let dataset =
            load_bytes(b"event_type,attendance\nTalk,10\nNA,20\nGala,N/A\nTalk,null\n").unwrap();
        assert_eq!(dataset.row_count(), 4);
        assert_eq!(dataset.text_column("event_type").unwrap().unwrap().null_count(), 1);
        assert_eq!(dataset.text_column("attendance").unwrap().unwrap().null_count(), 2);
    }

    #[test]
    fn test_blank_lines_are_not_rows() {
        let dataset = load_bytes(b"event_type,location\nTalk,Hall\n\nGala,Park\n\n\n").unwrap();
        assert_eq!(dataset.row_count(), 2);

        let types = dataset.text_column("event_type").unwrap().unwrap();
        let values: Vec<Option<&str>> = (&types).into_iter().collect();
        assert_eq!(values, vec![Some("Talk"), Some("Gala")]);
    }

    #[test]
    fn test_header_then_blank_lines_is_empty() {
        let result = load_bytes(b"event_type,location\n\n\n");
        assert!(matches!(result, Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_duplicate_header_is_counted() {
        let dataset = load_bytes(b"event_type,location,event_type\nTalk,Hall,Gala\n").unwrap();
        assert_eq!(dataset.duplicate_count("event_type"), 1);
        assert_eq!(dataset.duplicate_count("location"), 0);
    }

    #[test]
    fn test_header_only_is_empty() {
        let result = load_bytes(b"event_date,event_type\n");
        assert!(matches!(result, Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_blank_buffer_is_empty() {
        assert!(matches!(load_bytes(b""), Err(LoadError::Empty { .. })));
        assert!(matches!(load_bytes(b"\n  \n"), Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        match load_path(&path) {
            Err(LoadError::NotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_byte_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(matches!(load_path(&path), Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_directory_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_path(temp_dir.path());
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_load_reader_matches_load_bytes() {
        let content = "event_type\nConcert\nConcert\n";
        let from_reader = load_reader(content.as_bytes()).unwrap();
        assert_eq!(from_reader.row_count(), 2);
        assert_eq!(from_reader.source_name(), IN_MEMORY_SOURCE);
    }
}
