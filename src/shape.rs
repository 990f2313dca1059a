use crate::types::{RawTable, TableRole};
use polars::prelude::*;

/// Width of an annotation table in the 15-column `X ID` layout
pub const ANNOTATION_A_WIDTH: usize = 15;

/// Width of an annotation table in the 35-column `ORF ID` layout
pub const ANNOTATION_B_WIDTH: usize = 35;

/// Width of a differential expression table
pub const COUNTS_WIDTH: usize = 6;

/// Recognized column layouts, keyed by table width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    AnnotationShapeA,
    AnnotationShapeB,
    CountsShape,
    Unrecognized,
}

impl TableShape {
    /// Classifies a table by its column count alone.
    pub fn classify(table: &RawTable) -> Self {
        Self::from_width(table.width())
    }

    pub fn from_width(width: usize) -> Self {
        match width {
            ANNOTATION_A_WIDTH => TableShape::AnnotationShapeA,
            ANNOTATION_B_WIDTH => TableShape::AnnotationShapeB,
            COUNTS_WIDTH => TableShape::CountsShape,
            _ => TableShape::Unrecognized,
        }
    }
}

/// What a normalizer did to its input, for the presentation layer to render
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    pub role: TableRole,
    pub shape: TableShape,
    pub width: usize,
    /// Source columns kept in the canonical table
    pub selected: Vec<String>,
    /// `(source, canonical)` pairs for every renamed column
    pub renamed: Vec<(String, String)>,
    /// Columns computed from other columns
    pub derived: Vec<String>,
    /// Rows whose identifier could not be reduced to a join key
    pub unkeyed_rows: usize,
}

impl NormalizeReport {
    pub fn new(role: TableRole, shape: TableShape, width: usize) -> Self {
        NormalizeReport {
            role,
            shape,
            width,
            selected: Vec::new(),
            renamed: Vec::new(),
            derived: Vec::new(),
            unkeyed_rows: 0,
        }
    }
}

/// A canonical table together with the report of how it was produced
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: DataFrame,
    pub report: NormalizeReport,
}

/// Returns every name in `required` that is not a column of `table`, in order.
pub fn missing_columns(table: &RawTable, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| table.get_column_index(name).is_none())
        .map(|name| name.to_string())
        .collect()
}
