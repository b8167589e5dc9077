//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unknown object: {0}")]
    UnknownObject(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot allocate a grid of {cells} cells")]
    Allocation { cells: usize },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl Error {
    /// Configuration problems are detected before any generation runs.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimensions { .. }
                | Error::OutOfBounds { .. }
                | Error::UnknownObject(_)
                | Error::Config(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
