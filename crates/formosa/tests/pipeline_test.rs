//! End-to-end tests over a CSV directory.

use formosa::data::CsvDirectory;
use formosa::rules::RuleCategory;
use formosa::{Engine, FormosaError, PipelineConfig};
use std::fs;

const HEADER: &str = "date,stock_id,type,value,origin_name,stock_name,industry\n";

/// Two cement stocks over 2021: 1101 keeps clean cash flows, 1102 borrows
/// every quarter.
fn cement_csv() -> String {
    let mut csv = HEADER.to_string();
    for date in ["2021-03-31", "2021-06-30", "2021-09-30", "2021-12-31"] {
        for (id, name, proceeds) in [("1101", "台泥", 0.0), ("1102", "亞泥", 40.0)] {
            for (metric, value) in [
                ("CashFlowsFromOperatingActivities", 50.0),
                ("PropertyAndPlantAndEquipment", -20.0),
                ("ProceedsFromLongTermDebt", proceeds),
                ("RepaymentOfLongTermDebt", 10.0),
                ("EPS", 1.5),
            ] {
                csv.push_str(&format!(
                    "{},{},{},{},,{},水泥工業\n",
                    date, id, metric, value, name
                ));
            }
        }
    }
    csv
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("水泥工業.csv"), cement_csv()).unwrap();
    fs::write(
        dir.path().join("食品工業.csv"),
        format!("{}not-a-date,1201,EPS,1.0,,味全,食品工業\n", HEADER),
    )
    .unwrap();
    dir
}

#[test]
fn test_preload_records_failures_and_continues() {
    let dir = fixture();
    let engine = Engine::new(CsvDirectory::new(dir.path()), PipelineConfig::default());

    let report = engine.preload().unwrap();

    assert_eq!(report.loaded, ["水泥工業"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].industry, "食品工業");
    assert!(!report.is_clean());
    assert_eq!(engine.registry().industries(), ["水泥工業"]);
}

#[test]
fn test_best_stock_preloads_on_miss() {
    let dir = fixture();
    let engine = Engine::new(CsvDirectory::new(dir.path()), PipelineConfig::default());
    assert!(engine.registry().is_empty());

    let report = engine.best_stock("水泥工業").unwrap();

    assert_eq!(report.industry, "水泥工業");
    let cashflow = report.table(RuleCategory::CashFlow);
    assert_eq!(cashflow.rows[0].stock_id, "1101");
    assert_eq!(cashflow.value("1101", "Avg Free Cash Flow"), Some(30.0));
    assert_eq!(cashflow.value("1101", "Avg Net Debt Change"), Some(-10.0));
    // 1102 never passes, yet is still among the top five
    assert_eq!(cashflow.row("1102").map(|r| r.pass_rate), Some(0.0));
    assert!(report.to_markdown().contains("### Cash Flow Ranking"));
}

#[test]
fn test_best_stock_unknown_industry_lists_available() {
    let dir = fixture();
    let engine = Engine::new(CsvDirectory::new(dir.path()), PipelineConfig::default());

    let err = engine.best_stock("航運業").unwrap_err();

    assert!(err.is_not_found());
    match &err {
        FormosaError::IndustryNotFound { industry, available } => {
            assert_eq!(industry, "航運業");
            assert_eq!(available, &["水泥工業".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Available industries"));
}

#[test]
fn test_analyze_reregisters_industry() {
    let dir = fixture();
    let engine = Engine::new(CsvDirectory::new(dir.path()), PipelineConfig::default());

    let first = engine.analyze("水泥工業").unwrap();
    let before = engine.registry().get("水泥工業").unwrap();
    assert_eq!(first.cashflow.pass_rate("1101"), Some(1.0));

    let second = engine.analyze("水泥工業").unwrap();
    let after = engine.registry().get("水泥工業").unwrap();

    assert_eq!(engine.registry().len(), 1);
    assert_eq!(before.as_ref(), after.as_ref());
    assert_eq!(second.cashflow.ranking, first.cashflow.ranking);
}

#[test]
fn test_analyze_failing_industry_is_not_registered() {
    let dir = fixture();
    let engine = Engine::new(CsvDirectory::new(dir.path()), PipelineConfig::default());

    assert!(engine.analyze("食品工業").is_err());
    assert!(!engine.registry().contains("食品工業"));
}
