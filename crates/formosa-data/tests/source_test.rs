//! Integration tests for CSV sources and reshaping.

use formosa_data::{CsvDirectory, RecordSource, coverage, reshape, stock_directory};
use std::fs;

const SEMI_CSV: &str = "\
date,stock_id,type,value,origin_name,stock_name,industry
2024-03-31,2330,EPS,8.7,基本每股盈餘,台積電,半導體業
2024-03-31,2330,EPS,8.7,基本每股盈餘,台積電,半導體
2024-03-31,2330,Revenue,592644201,營業收入,台積電,半導體業
2023-12-31,2330,EPS,9.21,基本每股盈餘,台積電,半導體業
2024-03-31,2303,EPS,0.83,基本每股盈餘,聯電,半導體業
2024-03-31,2303,Revenue,,營業收入,聯電,半導體業
";

fn write_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("半導體業.csv"), SEMI_CSV).unwrap();
    fs::write(dir.path().join("水泥工業.csv"), "date,stock_id,stock_name,industry,type,value\n")
        .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a source").unwrap();
    dir
}

#[test]
fn test_csv_directory_lists_industries() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());

    let industries = source.industries().unwrap();
    assert_eq!(industries, vec!["半導體業".to_string(), "水泥工業".to_string()]);
    assert!(source.contains("半導體業"));
    assert!(!source.contains("notes"));
}

#[test]
fn test_csv_directory_skips_empty_values() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());

    let records = source.load("半導體業").unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.value.is_finite()));
    assert_eq!(records[0].stock_id, "2330");
    assert_eq!(records[0].metric, "EPS");
}

#[test]
fn test_load_then_reshape_drops_industry_duplicates() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());
    let records = source.load("半導體業").unwrap();

    let wide = reshape(&records).unwrap();
    // 2023-12-31/2330, 2024-03-31/2303, 2024-03-31/2330
    assert_eq!(wide.height(), 3);
    assert_eq!(wide.metrics(), ["EPS", "Revenue"]);
}

#[test]
fn test_reshape_is_deterministic() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());
    let records = source.load("半導體業").unwrap();

    let first = reshape(&records).unwrap();
    let second = reshape(&records).unwrap();
    assert!(first.frame().equals_missing(second.frame()));
}

#[test]
fn test_empty_source_file() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());

    let records = source.load("水泥工業").unwrap();
    assert!(records.is_empty());
    assert!(coverage(&records).is_none());
    assert!(reshape(&records).unwrap().is_empty());
}

#[test]
fn test_stock_directory_from_csv() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());

    let stocks = stock_directory(&source).unwrap();
    assert_eq!(stocks.len(), 2);
    assert!(stocks.iter().all(|s| s.industry_category == "半導體業"));
}

#[test]
fn test_coverage_of_csv_batch() {
    let dir = write_fixture();
    let source = CsvDirectory::new(dir.path());
    let records = source.load("半導體業").unwrap();

    let cov = coverage(&records).unwrap();
    assert_eq!(cov.first_period.to_string(), "2023-12-31");
    assert_eq!(cov.last_period.to_string(), "2024-03-31");
    assert_eq!(cov.stocks, 2);
}
