//! Directory loading error types.

use std::path::PathBuf;

/// Errors raised while loading a station directory at startup.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The file could not be opened
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("missing column {column:?}")]
    MissingColumn { column: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DirectoryError::MissingColumn {
            column: "geo_point_2d".into(),
        };
        assert_eq!(err.to_string(), "missing column \"geo_point_2d\"");

        let err = DirectoryError::Io {
            path: PathBuf::from("data/fgv-bocas.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read data/fgv-bocas.csv: no such file");
    }
}
