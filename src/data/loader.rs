//! CSV Data Loader Module
//! Reads the raw dataset into an ordered `Vec<RawRecord>` using the csv crate.

use crate::data::record::RawRecord;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Columns the schema requires before any row is deserialized.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "state_name",
    "region",
    "date",
    "wind_energy",
    "solar_energy",
    "other_renewable_energy",
    "total_renewable_energy",
];

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("failed to read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("required column '{0}' is missing from the dataset header")]
    MissingColumn(&'static str),
    #[error("malformed row at line {line}: {source}")]
    BadRow {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// Load the dataset at `path`, preserving source row order.
///
/// Fails if the file is unreadable, a required column is absent, or a row
/// cannot be deserialized into the schema. Value ranges are not validated
/// here; that is the cleaner's job.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, DataSourceError> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DataSourceError::Unreadable {
            path: display.clone(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| DataSourceError::Unreadable {
            path: display,
            source,
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataSourceError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        // Line numbers are 1-based and line 1 is the header.
        let record = result.map_err(|source| DataSourceError::BadRow {
            line: idx + 2,
            source,
        })?;
        records.push(record);
    }

    debug!(rows = records.len(), "deserialized dataset");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_rows_in_source_order() {
        let file = write_csv(
            "state_name,region,date,wind_energy,solar_energy,other_renewable_energy,total_renewable_energy\n\
             Tamil Nadu,South,2020-01-01,10.0,5.0,1.0,16.0\n\
             Gujarat,West,2020-02-01,,2.0,0.5,2.5\n",
        );

        let records = load_records(file.path()).expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state_name, "Tamil Nadu");
        assert_eq!(records[1].state_name, "Gujarat");
        assert_eq!(records[1].wind_energy, None);
        assert_eq!(records[1].total_renewable_energy, 2.5);
    }

    #[test]
    fn missing_column_is_rejected() {
        let file = write_csv(
            "state_name,date,wind_energy,solar_energy,other_renewable_energy,total_renewable_energy\n\
             Tamil Nadu,2020-01-01,10.0,5.0,1.0,16.0\n",
        );

        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn("region")));
    }

    #[test]
    fn unreadable_path_is_rejected() {
        let err = load_records(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, DataSourceError::Unreadable { .. }));
    }

    #[test]
    fn malformed_numeric_row_reports_line() {
        let file = write_csv(
            "state_name,region,date,wind_energy,solar_energy,other_renewable_energy,total_renewable_energy\n\
             Tamil Nadu,South,2020-01-01,10.0,5.0,1.0,16.0\n\
             Gujarat,West,2020-02-01,oops,2.0,0.5,2.5\n",
        );

        let err = load_records(file.path()).unwrap_err();
        match err {
            DataSourceError::BadRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
