use crate::error::{MergeError, Result};
use crate::types::RawTable;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Number of leading lines used to detect the delimiter
pub const SAMPLE_LINES: usize = 5;

/// Rows scanned before polars commits to a column type
pub const INFER_SCHEMA_ROWS: usize = 10_000;

/// Candidate delimiters, in order of preference when several fit the sample
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Share of sample lines, in percent, that must agree on a delimiter count
const CONSISTENCY_PERCENT: usize = 90;

/// Reads a delimited text file into a DataFrame, detecting its delimiter first.
///
/// Only the first [`SAMPLE_LINES`] lines are read for detection. The file is then
/// rewound and parsed in full, with column types inferred from up to
/// [`INFER_SCHEMA_ROWS`] rows. The header row becomes the column names.
///
/// # Arguments
/// * `path` - Path to the file, relative paths are resolved against the working directory
///
/// # Errors
/// * `MergeError::NotFound` - If the path does not resolve to an existing file
/// * `MergeError::DelimiterDetection` - If no delimiter fits the sample
/// * `MergeError::Parse` - If polars cannot parse the file with the detected delimiter
/// * `MergeError::Io` - For other file reading issues
pub fn load_table(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = resolve(path.as_ref())?;
    let mut file = File::open(&path)?;

    let sample = read_sample(&file, SAMPLE_LINES)?;
    if sample.trim().is_empty() {
        return Err(MergeError::delimiter_detection(&path, "file is empty"));
    }
    let delimiter = sniff_delimiter(&sample).ok_or_else(|| {
        MergeError::delimiter_detection(
            &path,
            "no candidate delimiter appears consistently in the first lines",
        )
    })?;
    let shown = (delimiter as char).escape_default().to_string();
    info!(path = %path.display(), delimiter = %shown, "detected delimiter");

    file.rewind()?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|opts| opts.with_separator(delimiter))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|source| MergeError::Parse {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "loaded table");
    Ok(df)
}

fn resolve(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) if resolved.is_file() => Ok(resolved),
        Ok(resolved) => Err(MergeError::NotFound { path: resolved }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MergeError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(MergeError::Io(e)),
    }
}

/// Reads at most `lines` lines from the start of `reader`, keeping line endings.
pub fn read_sample<R: Read>(reader: R, lines: usize) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut sample = String::new();

    for _ in 0..lines {
        if reader.read_line(&mut sample)? == 0 {
            break;
        }
    }

    Ok(sample)
}

/// Infers the field delimiter of a delimited text sample.
///
/// For each candidate the most common per-line count, outside quoted fields, is
/// taken. A candidate fits when that count is non-zero and at least 90% of the
/// non-empty sample lines share it. When several candidates fit, the first of
/// `,` `\t` `;` `|` wins.
///
/// # Returns
/// * `Some(delimiter)` - The detected delimiter byte
/// * `None` - If no candidate fits, e.g. a single-column or ragged sample
pub fn sniff_delimiter(sample: &str) -> Option<u8> {
    let lines: Vec<&str> = sample
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    CANDIDATE_DELIMITERS.into_iter().find(|&delimiter| {
        let mut frequencies: HashMap<usize, usize> = HashMap::new();
        for line in &lines {
            *frequencies.entry(count_unquoted(line, delimiter)).or_default() += 1;
        }

        let (count, agreeing) = frequencies
            .into_iter()
            .max_by_key(|&(count, agreeing)| (agreeing, count))
            .unwrap_or_default();

        count > 0 && agreeing * 100 >= lines.len() * CONSISTENCY_PERCENT
    })
}

/// Counts `delimiter` outside quoted fields.
///
/// A `"` opens a quoted field only at the start of a field, and `""` inside a
/// quoted field is an escaped quote.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut bytes = line.bytes().peekable();
    let mut in_quotes = false;
    let mut field_start = true;
    let mut count = 0;

    while let Some(byte) = bytes.next() {
        if in_quotes {
            if byte == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
        } else if byte == delimiter {
            count += 1;
            field_start = true;
            continue;
        } else if byte == b'"' && field_start {
            in_quotes = true;
        }
        field_start = false;
    }

    count
}
