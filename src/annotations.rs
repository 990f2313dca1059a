use crate::error::{MergeError, Result};
use crate::shape::{missing_columns, NormalizeReport, Normalized, TableShape};
use crate::shape::{ANNOTATION_A_WIDTH, ANNOTATION_B_WIDTH};
use crate::types::*;
use polars::prelude::*;

/// Identifier column of the 15-column layout
pub const X_ID: &str = "X ID";

/// Identifier column of the 35-column layout
pub const ORF_ID: &str = "ORF ID";

pub const SHAPE_A_COLUMNS: [&str; 3] = [X_ID, "GENENAME", "DESCRIPTION"];

pub const SHAPE_B_COLUMNS: [&str; 12] = [
    ORF_ID,
    "Gene name",
    "Gene length",
    "ORF length",
    "ORF start",
    "ORF end",
    "Strand",
    "Protein sequence",
    "Pfam",
    "InterPro",
    "GENENAME",
    "DESCRIPTION",
];

/// Number of `::` segments kept when canonicalizing an `X ID`
const ID_SEGMENTS: usize = 3;

/// Validates an annotation table and projects it onto its canonical columns.
///
/// The layout is chosen by column count:
/// - 15 columns: `X ID`, `GENENAME`, `DESCRIPTION` are required. Output columns are
///   `ID` (first three `::` segments of `X ID`), `old_ID` (the original `X ID`),
///   `GENENAME`, `DESCRIPTION`.
/// - 35 columns: the twelve [`SHAPE_B_COLUMNS`] are required. `ORF ID` becomes `ID`
///   and the other eleven pass through unchanged.
///
/// # Errors
/// * `MergeError::UnsupportedShape` - If the width is neither 15 nor 35
/// * `MergeError::SchemaValidation` - If required columns are absent, listing all of them
/// * `MergeError::Data` - If the projection fails
pub fn normalize_annotations(table: RawTable) -> Result<Normalized> {
    match TableShape::classify(&table) {
        TableShape::AnnotationShapeA => normalize_shape_a(table),
        TableShape::AnnotationShapeB => normalize_shape_b(table),
        _ => Err(MergeError::unsupported_shape(
            TableRole::Annotations,
            table.width(),
            &[ANNOTATION_A_WIDTH, ANNOTATION_B_WIDTH],
        )),
    }
}

fn require(table: &RawTable, required: &[&str]) -> Result<()> {
    let missing = missing_columns(table, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MergeError::SchemaValidation {
            role: TableRole::Annotations,
            missing,
        })
    }
}

fn normalize_shape_a(mut table: RawTable) -> Result<Normalized> {
    require(&table, &SHAPE_A_COLUMNS)?;
    let mut report = NormalizeReport::new(
        TableRole::Annotations,
        TableShape::AnnotationShapeA,
        table.width(),
    );

    let x_ids = table.column(X_ID)?.cast(&DataType::String)?;
    let ids: Vec<Option<String>> = x_ids
        .str()?
        .into_iter()
        .map(|x_id| x_id.map(canonical_annotation_id))
        .collect();
    table.with_column(Column::new(ID.into(), ids))?;

    let canonical = table
        .lazy()
        .select([
            col(ID),
            col(X_ID).cast(DataType::String).alias(OLD_ID),
            col("GENENAME"),
            col("DESCRIPTION"),
        ])
        .collect()?;

    report.selected = SHAPE_A_COLUMNS.iter().map(|c| c.to_string()).collect();
    report.renamed.push((X_ID.to_string(), OLD_ID.to_string()));
    report.derived.push(ID.to_string());

    Ok(Normalized {
        table: canonical,
        report,
    })
}

fn normalize_shape_b(table: RawTable) -> Result<Normalized> {
    require(&table, &SHAPE_B_COLUMNS)?;
    let mut report = NormalizeReport::new(
        TableRole::Annotations,
        TableShape::AnnotationShapeB,
        table.width(),
    );

    let mut projection = vec![col(ORF_ID).cast(DataType::String).alias(ID)];
    projection.extend(SHAPE_B_COLUMNS[1..].iter().map(|name| col(*name)));

    let canonical = table.lazy().select(projection).collect()?;

    report.selected = SHAPE_B_COLUMNS.iter().map(|c| c.to_string()).collect();
    report.renamed.push((ORF_ID.to_string(), ID.to_string()));

    Ok(Normalized {
        table: canonical,
        report,
    })
}

/// Keeps the first three `::` separated segments of an annotation identifier.
///
/// Identifiers with fewer segments are returned unchanged.
///
/// ```
/// use merge_tables::annotations::canonical_annotation_id;
///
/// assert_eq!(canonical_annotation_id("g1::iso1::v1::p2"), "g1::iso1::v1");
/// assert_eq!(canonical_annotation_id("g1::iso1"), "g1::iso1");
/// ```
pub fn canonical_annotation_id(x_id: &str) -> String {
    x_id.split(ANNOTATION_ID_SEPARATOR)
        .take(ID_SEGMENTS)
        .collect::<Vec<_>>()
        .join(ANNOTATION_ID_SEPARATOR)
}
