use crate::types::TableRole;
use polars::prelude::PolarsError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("could not detect a field delimiter in {}: {reason}", .path.display())]
    DelimiterDetection { path: PathBuf, reason: String },

    #[error(
        "{role} table has {observed} columns, expected {}",
        format_widths(.expected)
    )]
    UnsupportedShape {
        role: TableRole,
        observed: usize,
        expected: Vec<usize>,
    },

    #[error("{role} table is missing required column(s): {}", .missing.join(", "))]
    SchemaValidation {
        role: TableRole,
        missing: Vec<String>,
    },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Data error: {0}")]
    Data(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;

impl MergeError {
    /// Create a new UnsupportedShape error
    pub fn unsupported_shape(role: TableRole, observed: usize, expected: &[usize]) -> Self {
        MergeError::UnsupportedShape {
            role,
            observed,
            expected: expected.to_vec(),
        }
    }

    /// Create a new DelimiterDetection error
    pub fn delimiter_detection(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MergeError::DelimiterDetection {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Pipeline stage the error belongs to, used when reporting failures.
    pub fn stage(&self) -> &'static str {
        match self {
            MergeError::NotFound { .. }
            | MergeError::DelimiterDetection { .. }
            | MergeError::Parse { .. }
            | MergeError::Io(_) => "load",
            MergeError::UnsupportedShape { .. } | MergeError::SchemaValidation { .. } => {
                "normalize"
            }
            MergeError::Data(_) => "merge",
            MergeError::Write { .. } => "write",
        }
    }
}

fn format_widths(widths: &[usize]) -> String {
    let widths: Vec<String> = widths.iter().map(|w| w.to_string()).collect();
    widths.join(" or ")
}
