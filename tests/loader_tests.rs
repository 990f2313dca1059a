use merge_tables::error::MergeError;
use merge_tables::loader::{self, load_table, read_sample, sniff_delimiter};
use polars::prelude::*;
use std::io::Write;

#[test]
fn test_sniff_delimiter() {
    assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n4,5,6\n"), Some(b','));
    assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), Some(b'\t'));
    assert_eq!(sniff_delimiter("a;b;c\r\n1;2;3\r\n"), Some(b';'));
    assert_eq!(sniff_delimiter("a|b\n1|2\n"), Some(b'|'));

    // header-only sample
    assert_eq!(sniff_delimiter(",ControlDMSO,DEHP,theta,prob,log2FC\n"), Some(b','));

    // delimiters inside quotes are not counted
    let sample = "X ID\tGENENAME\tDESCRIPTION\ng1\tACT1\t\"actin\tcytoplasmic\"\n";
    assert_eq!(sniff_delimiter(sample), Some(b'\t'));
    let sample = "id,desc\ng1,\"actin, cytoplasmic\"\ng2,tubulin\n";
    assert_eq!(sniff_delimiter(sample), Some(b','));

    // tab wins over a comma that is not consistent across lines
    let sample = "id\tdesc\ng1\tactin, cytoplasmic\ng2\ttubulin\n";
    assert_eq!(sniff_delimiter(sample), Some(b'\t'));

    // a quote inside an unquoted field does not open a quoted section
    let sample = "id,desc,len\ng1,5\" UTR region,3\ng2,tubulin,4\ng3,x,5\n";
    assert_eq!(sniff_delimiter(sample), Some(b','));

    // doubled quotes inside a quoted field are escapes
    let sample = "id,desc\ng1,\"say \"\"hi\"\", ok\"\ng2,x\n";
    assert_eq!(sniff_delimiter(sample), Some(b','));

    // ':' inside identifiers is never taken as a delimiter
    let sample = "X ID\ng1::iso1::v1\ng2::iso1::v1\n";
    assert_eq!(sniff_delimiter(sample), None);
}

#[test]
fn test_sniff_delimiter_tolerates_one_ragged_line_in_ten() {
    let mut sample = String::from("gene,value\n");
    for i in 0..8 {
        sample.push_str(&format!("g{},{}\n", i, i));
    }
    sample.push_str("g8,1,extra\n");
    assert_eq!(sniff_delimiter(&sample), Some(b','));

    // two ragged lines out of ten is too many
    sample.push_str("g9,2,extra\n");
    let lines: Vec<&str> = sample.lines().skip(1).collect();
    assert_eq!(sniff_delimiter(&lines.join("\n")), None);
}

#[test]
fn test_sniff_delimiter_failures() {
    assert_eq!(sniff_delimiter(""), None);
    assert_eq!(sniff_delimiter("\n\n"), None);
    assert_eq!(sniff_delimiter("gene\ng1\ng2\n"), None);

    // ragged rows
    assert_eq!(sniff_delimiter("a,b,c\n1,2\n3,4,5\n"), None);
}

#[test]
fn test_read_sample() {
    let content = "l1\nl2\nl3\nl4\nl5\nl6\nl7\n";
    let sample = read_sample(content.as_bytes(), loader::SAMPLE_LINES).unwrap();
    assert_eq!(sample, "l1\nl2\nl3\nl4\nl5\n");

    let sample = read_sample("only\n".as_bytes(), loader::SAMPLE_LINES).unwrap();
    assert_eq!(sample, "only\n");
}

#[test]
fn test_load_comma_separated() {
    let df = load_table("tests/data/annotations_15.csv").unwrap();
    assert_eq!(df.width(), 15);
    assert_eq!(df.height(), 4);

    let descriptions = df.column("DESCRIPTION").unwrap().str().unwrap();
    assert_eq!(descriptions.get(0), Some("actin, cytoplasmic"));
}

#[test]
fn test_load_tab_separated() {
    let df = load_table("tests/data/annotations_35.tsv").unwrap();
    assert_eq!(df.width(), 35);
    assert_eq!(df.height(), 2);
    assert_eq!(
        df.column("ORF ID").unwrap().str().unwrap().get(1),
        Some("g4::iso1::v2")
    );
}

#[test]
fn test_load_infers_column_types() {
    let df = load_table("tests/data/counts.csv").unwrap();
    assert_eq!(df.width(), 6);
    assert_eq!(df.height(), 4);

    let columns = df.get_columns();
    assert_eq!(columns[0].dtype(), &DataType::String);
    for column in &columns[1..] {
        assert_eq!(column.dtype(), &DataType::Float64);
    }
}

#[test]
fn test_load_semicolon_separated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "gene;value\ng1;1\ng2;2\n").unwrap();

    let df = load_table(file.path()).unwrap();
    assert_eq!(df.width(), 2);
    assert_eq!(df.height(), 2);
    assert_eq!(df.column("value").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_load_unquoted_field_with_quote() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "id,desc,len\ng1,5\" UTR region,3\ng2,tubulin,4\ng3,x,5\n").unwrap();

    let df = load_table(file.path()).unwrap();
    assert_eq!(df.width(), 3);
    assert_eq!(df.height(), 3);
    assert_eq!(
        df.column("len").unwrap().i64().unwrap().get(2),
        Some(5)
    );
}

#[test]
fn test_load_errors() {
    let result = load_table("tests/data/nonexistent.csv");
    assert!(matches!(result, Err(MergeError::NotFound { .. })));

    let result = load_table("tests/data");
    assert!(matches!(result, Err(MergeError::NotFound { .. })));

    let result = load_table("tests/data/single_column.txt");
    assert!(matches!(result, Err(MergeError::DelimiterDetection { .. })));

    let empty = tempfile::NamedTempFile::new().unwrap();
    let result = load_table(empty.path());
    assert!(matches!(result, Err(MergeError::DelimiterDetection { .. })));
}
