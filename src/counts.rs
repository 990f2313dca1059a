use crate::error::{MergeError, Result};
use crate::shape::{NormalizeReport, Normalized, TableShape, COUNTS_WIDTH};
use crate::types::*;
use polars::prelude::*;

/// Validates a differential expression table and renames it onto the canonical counts columns.
///
/// The first column, whatever its header (often empty), becomes `old_ID`. An `ID`
/// column is derived from it by [`counts_id`]. The remaining five columns are
/// renamed by position to [`COUNTS_VALUE_COLUMNS`] without touching their values.
///
/// # Returns
/// * `Result<Normalized>` - A table with columns
///   `old_ID, ID, countsfiltered_ControlDMSO_mean, countsfiltered_DEHP_mean, theta, prob, log2FC`
///
/// # Errors
/// * `MergeError::UnsupportedShape` - If the table does not have exactly 6 columns
/// * `MergeError::Data` - If the projection fails
pub fn normalize_counts(mut table: RawTable) -> Result<Normalized> {
    let shape = TableShape::classify(&table);
    if shape != TableShape::CountsShape {
        return Err(MergeError::unsupported_shape(
            TableRole::Counts,
            table.width(),
            &[COUNTS_WIDTH],
        ));
    }

    let mut report = NormalizeReport::new(TableRole::Counts, shape, table.width());
    let source_names: Vec<String> = table
        .get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    // Renaming by position also drops any source column that was already called "ID"
    let mut canonical_names = vec![PlSmallStr::from(OLD_ID)];
    canonical_names.extend(COUNTS_VALUE_COLUMNS.iter().map(|name| PlSmallStr::from(*name)));
    table.set_column_names(canonical_names)?;

    let old_ids = table.column(OLD_ID)?.cast(&DataType::String)?;
    let old_ids = old_ids.str()?;
    let ids: Vec<Option<String>> = old_ids
        .into_iter()
        .map(|old_id| old_id.map(|v| counts_id(v).unwrap_or_default().to_string()))
        .collect();
    report.unkeyed_rows = old_ids
        .into_iter()
        .flatten()
        .filter(|v| counts_id(v).is_none())
        .count();
    table.with_column(Column::new(ID.into(), ids))?;

    let mut projection = vec![col(OLD_ID).cast(DataType::String), col(ID)];
    projection.extend(COUNTS_VALUE_COLUMNS.iter().map(|name| col(*name)));
    let canonical = table.lazy().select(projection).collect()?;

    report.selected = source_names.clone();
    report.renamed = source_names
        .into_iter()
        .zip(std::iter::once(OLD_ID).chain(COUNTS_VALUE_COLUMNS))
        .map(|(source, canonical)| (source, canonical.to_string()))
        .collect();
    report.derived.push(ID.to_string());

    Ok(Normalized {
        table: canonical,
        report,
    })
}

/// Returns the part of a counts identifier after the first `~~`, or `None` when
/// the marker is absent.
///
/// ```
/// use merge_tables::counts::counts_id;
///
/// assert_eq!(counts_id("sampleA~~g1::iso1::v1"), Some("g1::iso1::v1"));
/// assert_eq!(counts_id("a~~b~~c"), Some("b~~c"));
/// assert_eq!(counts_id("no-marker"), None);
/// ```
pub fn counts_id(old_id: &str) -> Option<&str> {
    old_id
        .find(COUNTS_ID_MARKER)
        .map(|start| &old_id[start + COUNTS_ID_MARKER.len()..])
}
