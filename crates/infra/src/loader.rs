//! CSV import of historical order rows.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use stockcast_dataset::RawSalesRecord;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {message}")]
    Csv { line: u64, message: String },
}

/// Read order rows from CSV with a header line.
///
/// Headers and fields are trimmed. The first bad row aborts the import.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<RawSalesRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<RawSalesRecord>().enumerate() {
        let record = result.map_err(|e| LoadError::Csv {
            // Header is line 1.
            line: e.position().map_or(index as u64 + 2, |p| p.line()),
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_records_file(path: impl AsRef<Path>) -> Result<Vec<RawSalesRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_records(BufReader::new(file))?;
    info!(path = %path.display(), rows = records.len(), "sales file loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SALES_CSV;
    use std::io::Write;

    #[test]
    fn reads_spanish_headers() {
        let records = load_records(SALES_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[0], RawSalesRecord::new("2023-01-05", "Caja", 1500));
    }

    #[test]
    fn reads_english_headers_and_trims() {
        let csv = "order_date , category , units\n 2024-05-01 ,  Widget , 12 \n";
        let records = load_records(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![RawSalesRecord::new("2024-05-01", "Widget", 12)]);
    }

    #[test]
    fn reports_line_of_bad_row() {
        let csv = "order_date,category,units\n2024-05-01,Widget,12\n2024-05-02,Widget,many\n";
        match load_records(csv.as_bytes()) {
            Err(LoadError::Csv { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "order_date,units\n2024-05-01,12\n";
        assert!(matches!(load_records(csv.as_bytes()), Err(LoadError::Csv { .. })));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SALES_CSV.as_bytes()).unwrap();
        let records = load_records_file(file.path()).unwrap();
        assert_eq!(records.len(), 15);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records_file(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
