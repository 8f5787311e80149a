use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised while reading or writing CSV files.
pub enum CsvHelperError {
    /// A required argument was empty.
    #[error("Argument missing: {0}")]
    ArgumentMissing(&'static str),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A single row could not be parsed or deserialized. `line` is 1-based
    /// and absent when the csv reader reports no position.
    #[error(
        "Invalid record{}: {message}",
        .line.map(|line| format!(" at line {line}")).unwrap_or_default()
    )]
    Record { line: Option<u64>, message: String },

    /// A field declared in a class map has no matching column.
    #[error("Field `{field}` is mapped to column `{column}` which is missing from the file")]
    MissingField { field: String, column: String },

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CsvHelperError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::CsvHelperError;

    #[test]
    fn messages_should_name_the_offending_argument() {
        let error = CsvHelperError::ArgumentMissing("csv_file");
        assert_eq!(error.to_string(), "Argument missing: csv_file");

        let error = CsvHelperError::FileNotFound(PathBuf::from("/Working/test.csv"));
        assert_eq!(error.to_string(), "File not found: /Working/test.csv");

        let error = CsvHelperError::MissingField {
            field: "id".to_string(),
            column: "EmployeeId".to_string(),
        };
        assert!(error.to_string().contains("EmployeeId"));
    }

    #[test]
    fn record_messages_should_include_known_lines_only() {
        let error = CsvHelperError::Record {
            line: Some(3),
            message: "invalid digit".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid record at line 3: invalid digit");

        let error = CsvHelperError::Record {
            line: None,
            message: "invalid digit".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid record: invalid digit");
    }

    #[test]
    fn io_errors_should_convert() {
        let error: CsvHelperError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(error, CsvHelperError::Io(_)));
    }
}
