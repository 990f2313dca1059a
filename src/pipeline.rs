use crate::annotations::normalize_annotations;
use crate::counts::normalize_counts;
use crate::error::Result;
use crate::loader::load_table;
use crate::merge::{matched_rows, merge};
use crate::shape::NormalizeReport;
use crate::types::{MergedTable, COUNTS_ID_MARKER};
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs and output location of one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub annotations: PathBuf,
    pub counts: PathBuf,
    pub output_dir: PathBuf,
    /// File name of the merged table, extension included
    pub output_name: String,
}

impl MergeConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

/// Loads both tables, normalizes them and writes their merge.
///
/// Any load or validation failure stops the run before the join, so no output
/// file is created unless both tables normalized successfully.
pub fn run(config: &MergeConfig) -> Result<MergedTable> {
    info!(path = %config.annotations.display(), "loading annotations table");
    let annotations = normalize_annotations(load_table(&config.annotations)?)?;
    render_report(&annotations.report);

    info!(path = %config.counts.display(), "loading counts table");
    let counts = normalize_counts(load_table(&config.counts)?)?;
    render_report(&counts.report);

    let matched = matched_rows(&counts.table, &annotations.table)?;
    let counts_rows = counts.table.height();
    if matched < counts_rows {
        warn!(
            unmatched = counts_rows - matched,
            "counts rows without annotation, annotation columns left empty"
        );
    }

    let output = config.output_path();
    let merged = merge(counts.table, annotations.table, &output)?;
    info!(
        path = %output.display(),
        counts_rows,
        matched,
        merged_rows = merged.height(),
        "merged table written"
    );

    Ok(merged)
}

/// Renders what a normalizer did as log events.
pub fn render_report(report: &NormalizeReport) {
    info!(
        table = %report.role,
        shape = ?report.shape,
        width = report.width,
        "table layout recognized"
    );
    info!(table = %report.role, columns = ?report.selected, "selected columns");
    for (from, to) in &report.renamed {
        info!(table = %report.role, "column {:?} renamed to {:?}", from, to);
    }
    for derived in &report.derived {
        info!(table = %report.role, "column {:?} derived", derived);
    }
    if report.unkeyed_rows > 0 {
        warn!(
            table = %report.role,
            rows = report.unkeyed_rows,
            "identifiers without {:?} get an empty ID and never match an annotation",
            COUNTS_ID_MARKER
        );
    }
}
