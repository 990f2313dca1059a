use polars::prelude::*;
use std::fmt;

/// A table as parsed from disk, column names taken from the header row
pub type RawTable = DataFrame;

/// Annotation table projected onto one of the canonical annotation layouts.
/// Always exposes a string `ID` column; `ID` values may repeat.
pub type CanonicalAnnotationTable = DataFrame;

/// Differential expression table with the canonical counts columns
pub type CountsTable = DataFrame;

/// Counts table left-joined with the annotation table on `ID`
pub type MergedTable = DataFrame;

pub const ID: &str = "ID";
pub const OLD_ID: &str = "old_ID";

/// Marker separating the sample prefix from the gene identifier in counts `old_ID` values
pub const COUNTS_ID_MARKER: &str = "~~";

/// Separator between identifier segments in annotation `X ID` values
pub const ANNOTATION_ID_SEPARATOR: &str = "::";

/// Canonical names given, by position, to the five value columns of a counts table
pub const COUNTS_VALUE_COLUMNS: [&str; 5] = [
    "countsfiltered_ControlDMSO_mean",
    "countsfiltered_DEHP_mean",
    "theta",
    "prob",
    "log2FC",
];

/// Which input a table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Annotations,
    Counts,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRole::Annotations => write!(f, "annotations"),
            TableRole::Counts => write!(f, "counts"),
        }
    }
}
