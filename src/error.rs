use std::path::PathBuf;

/// Failure kinds raised by the pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// Missing or invalid configuration (database path, schema name, year window)
    #[error("configuration error: {0}")]
    Config(String),

    /// Could not reach the database or the dataset host
    #[error("connection error: {0}")]
    Connection(String),

    #[error("failed to load CSV file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset download failed: {0}")]
    Download(String),

    /// Anything that went wrong while writing a table, including the
    /// configuration and connection failures that prevented the write.
    #[error("{0}")]
    QueryExecution(String),
}

impl EtlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        EtlError::Csv {
            path: path.into(),
            source,
        }
    }
}
