use crate::error::{MergeError, Result};
use crate::types::*;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Delimiter of the merged output file
pub const OUTPUT_DELIMITER: u8 = b',';

/// Suffix given to annotation columns whose name already exists in the counts table
pub const ANNOTATION_SUFFIX: &str = "_annotation";

/// Left-joins annotations onto counts by `ID`.
///
/// Every counts row is kept. Counts rows without a matching annotation get nulls in
/// the annotation columns, and counts rows matching several annotations appear once
/// per match. The `ID` key appears once in the output, annotation columns follow
/// the counts columns in their canonical order.
///
/// # Errors
/// * `MergeError::Data` - If either table lacks an `ID` column or the join fails
pub fn join_tables(
    counts: CountsTable,
    annotations: CanonicalAnnotationTable,
) -> Result<MergedTable> {
    let merged = counts
        .lazy()
        .join(
            annotations.lazy(),
            [col(ID)],
            [col(ID)],
            JoinArgs::new(JoinType::Left).with_suffix(Some(ANNOTATION_SUFFIX.into())),
        )
        .collect()?;

    Ok(merged)
}

/// Writes a table as comma separated text with a header row.
///
/// A partially written file is removed before the error is returned.
///
/// # Errors
/// * `MergeError::Write` - If the file cannot be created or written
pub fn write_table(table: &mut DataFrame, path: &Path) -> Result<()> {
    let write_error = |source: io::Error| MergeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    let written = CsvWriter::new(&mut writer)
        .include_header(true)
        .with_separator(OUTPUT_DELIMITER)
        .finish(table)
        .map_err(|e| io::Error::other(e.to_string()));
    let written = written.and_then(|_| writer.flush());

    if let Err(source) = written {
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(write_error(source));
    }

    debug!(path = %path.display(), rows = table.height(), "wrote table");
    Ok(())
}

/// Joins counts with annotations and writes the result to `output`.
///
/// The file is fully written before the merged table is returned.
///
/// # Errors
/// * `MergeError::Data` - If the join fails
/// * `MergeError::Write` - If the output cannot be written
pub fn merge(
    counts: CountsTable,
    annotations: CanonicalAnnotationTable,
    output: &Path,
) -> Result<MergedTable> {
    let mut merged = join_tables(counts, annotations)?;
    write_table(&mut merged, output)?;
    Ok(merged)
}

/// Number of counts rows whose `ID` has at least one annotation.
///
/// # Errors
/// * `MergeError::Data` - If either table lacks a string `ID` column
pub fn matched_rows(counts: &CountsTable, annotations: &CanonicalAnnotationTable) -> Result<usize> {
    let annotation_ids: HashSet<&str> = annotations
        .column(ID)?
        .str()?
        .into_iter()
        .flatten()
        .collect();

    let matched = counts
        .column(ID)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|id| annotation_ids.contains(id))
        .count();

    Ok(matched)
}
