//! Tests for CSV block extraction

use super::super::csv_block::{CsvBlockOptions, HeaderPolicy, TabularBlock};
use super::{pattern, reader};

#[test]
fn test_pop_csv_block_as_lines_trims_surrounding_blanks() {
    let mut source = reader(&["", "  ", "A,B", "1,2", "", "", "next block"]);
    let block = source.pop_csv_block_as_lines();
    assert_eq!(block, vec!["A,B", "1,2"]);
    assert_eq!(source.get(), Some("next block"));
}

#[test]
fn test_pop_csv_block_as_lines_custom_empty_pattern() {
    // some exports pad "blank" rows with separators
    let mut source = reader(&[",,,", "A,B,C", "1,2,3", ",,,", "rest"]);
    let empty = pattern(r"^[,\s]*$");
    let block = source.pop_csv_block_as_lines_match(&empty);
    assert_eq!(block, vec!["A,B,C", "1,2,3"]);
    assert_eq!(source.get(), Some("rest"));
}

#[test]
fn test_empty_block_is_none_not_error() {
    let mut source = reader(&["", ""]);
    let table = source
        .pop_csv_block_as_table(&CsvBlockOptions::default())
        .unwrap();
    assert!(table.is_none());
}

#[test]
fn test_simple_block_parse() {
    let mut source = reader(&["A,B", "1,2", "3,4"]);
    let table = source
        .pop_csv_block_as_table(&CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(table.column_names(), &["A".to_string(), "B".to_string()]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row(0).unwrap(), &["1".to_string(), "2".to_string()]);
    assert_eq!(table.row(1).unwrap(), &["3".to_string(), "4".to_string()]);
}

#[test]
fn test_decimal_precision_preserved_verbatim() {
    let mut source = reader(&["conc", "0.500", "12.30", "1e-3"]);
    let table = source
        .pop_csv_block_as_table(&CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(table.row(0).unwrap()[0], "0.500");
    assert_eq!(table.row(1).unwrap()[0], "12.30");
    assert_eq!(table.row(2).unwrap()[0], "1e-3");
}

#[test]
fn test_ragged_rows_recovered_by_normalization() {
    let lines: Vec<String> = ["well,signal,flag", "A1,100", "A2,200,ok,extra"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(table.column_names().len(), 3);
    assert_eq!(table.len(), 2); // no rows dropped
    assert_eq!(
        table.row(0).unwrap(),
        &["A1".to_string(), "100".to_string(), String::new()]
    );
    assert_eq!(
        table.row(1).unwrap(),
        &["A2".to_string(), "200".to_string(), "ok".to_string()]
    );

    let stats = table.stats();
    assert_eq!(stats.rows_parsed, 2);
    assert!(stats.rows_normalized >= 1);
    assert!(!stats.errors.is_empty());
}

#[test]
fn test_uniform_short_rows_padded_to_header_width() {
    // rows agree with each other but not with the header
    let lines: Vec<String> = ["a,b,c", "1,2", "3,4"].iter().map(|s| s.to_string()).collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(table.column_names().len(), 3);
    assert_eq!(table.row(0).unwrap().len(), 3);
    assert_eq!(table.row(0).unwrap()[2], "");
    assert_eq!(table.stats().rows_normalized, 2);
}

#[test]
fn test_positional_header_policy() {
    let lines: Vec<String> = ["1,2,3", "4,5,6"].iter().map(|s| s.to_string()).collect();
    let options = CsvBlockOptions {
        header: HeaderPolicy::Positional,
        ..CsvBlockOptions::default()
    };
    let table = TabularBlock::parse(&lines, &options).unwrap().unwrap();

    assert_eq!(
        table.column_names(),
        &["0".to_string(), "1".to_string(), "2".to_string()]
    );
    assert_eq!(table.len(), 2);
}

#[test]
fn test_header_row_index_skips_earlier_lines() {
    let lines: Vec<String> = ["Plate 1 results", "well,signal", "A1,100"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let options = CsvBlockOptions {
        header: HeaderPolicy::Row(1),
        ..CsvBlockOptions::default()
    };
    let table = TabularBlock::parse(&lines, &options).unwrap().unwrap();

    assert_eq!(
        table.column_names(),
        &["well".to_string(), "signal".to_string()]
    );
    assert_eq!(table.len(), 1);
}

#[test]
fn test_header_row_out_of_range_fails() {
    let lines: Vec<String> = vec!["only line".to_string()];
    let options = CsvBlockOptions {
        header: HeaderPolicy::Row(3),
        ..CsvBlockOptions::default()
    };
    let err = TabularBlock::parse(&lines, &options).unwrap_err();
    assert!(err.to_string().contains("header row 3"));
}

#[test]
fn test_blank_and_duplicate_headers_disambiguated() {
    let lines: Vec<String> = ["temp,temp,,", "1,2,3,4"].iter().map(|s| s.to_string()).collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(
        table.column_names(),
        &[
            "temp".to_string(),
            "temp_2".to_string(),
            "unnamed_2".to_string(),
            "unnamed_3".to_string(),
        ]
    );
}

#[test]
fn test_tab_separated_block() {
    let lines: Vec<String> = ["a\tb", "1\t2"].iter().map(|s| s.to_string()).collect();
    let options = CsvBlockOptions {
        separator: b'\t',
        ..CsvBlockOptions::default()
    };
    let table = TabularBlock::parse(&lines, &options).unwrap().unwrap();
    assert_eq!(table.column_names(), &["a".to_string(), "b".to_string()]);
    assert_eq!(table.row(0).unwrap(), &["1".to_string(), "2".to_string()]);
}

#[test]
fn test_round_trip_reserialization() {
    let text = ["A,B", "1,2", "3,4"];
    let lines: Vec<String> = text.iter().map(|s| s.to_string()).collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    let serialized = table.to_csv_string(b',').unwrap();
    assert_eq!(serialized.trim_end(), text.join("\n"));
}

#[test]
fn test_series_wraps_row_with_column_names() {
    let lines: Vec<String> = ["well,signal", "A1,100"].iter().map(|s| s.to_string()).collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    let mut series = table.series(0).unwrap();
    assert_eq!(series.get_optional::<String>("well"), Some("A1".to_string()));
    assert_eq!(series.get_optional::<i64>("signal"), Some(100));
    assert!(table.series(5).is_none());
}

#[test]
fn test_iter_series_covers_all_rows() {
    let lines: Vec<String> = ["v", "1", "2", "3"].iter().map(|s| s.to_string()).collect();
    let table = TabularBlock::parse(&lines, &CsvBlockOptions::default())
        .unwrap()
        .unwrap();

    let values: Vec<i64> = table
        .iter_series()
        .map(|mut s| s.get_required::<i64>("v").unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}
