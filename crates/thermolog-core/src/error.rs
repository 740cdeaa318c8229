use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by thermolog.
#[derive(Error, Debug)]
pub enum ThermoError {
    /// A report could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The strict CSV reader failed for a reason other than ragged rows.
    #[error("Failed to parse CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The line-splitting fallback could not line a row up with the header.
    #[error("Ragged report {path}: line {line} has {found} fields, header has {expected}")]
    RaggedReport {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A column the parser depends on is absent from the header.
    #[error("Report {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the thermolog crates.
pub type Result<T> = std::result::Result<T, ThermoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ThermoError::FileRead {
            path: PathBuf::from("/reports/jan.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/reports/jan.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_ragged_report() {
        let err = ThermoError::RaggedReport {
            path: PathBuf::from("feb.csv"),
            line: 7,
            expected: 6,
            found: 9,
        };
        assert_eq!(
            err.to_string(),
            "Ragged report feb.csv: line 7 has 9 fields, header has 6"
        );
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = ThermoError::MissingColumn {
            path: PathBuf::from("mar.csv"),
            column: "HvacMode".to_string(),
        };
        assert_eq!(err.to_string(), "Report mar.csv has no 'HvacMode' column");
    }

    #[test]
    fn test_error_display_config() {
        let err = ThermoError::Config("band width must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: band width must be positive"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ThermoError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: ThermoError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
