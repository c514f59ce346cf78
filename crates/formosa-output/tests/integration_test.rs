//! Integration tests for rendering and exporting evaluated industries.

use chrono::NaiveDate;
use formosa_data::{RawRecord, reshape};
use formosa_output::{BestStockReport, ExportFormat, Exporter, TableView};
use formosa_rules::{EvaluationConfig, RuleCategory, rule_set};
use rstest::rstest;

fn records() -> Vec<RawRecord> {
    let quarters = ["2019-12-31", "2020-03-31", "2020-06-30"];
    let stocks = [("1216", "統一", 120.0), ("1227", "佳格", 40.0)];
    let mut out = Vec::new();

    for (id, name, ocf) in stocks {
        for q in quarters {
            let date = NaiveDate::parse_from_str(q, "%Y-%m-%d").unwrap();
            let mut push = |metric: &str, value: f64| {
                out.push(RawRecord::new(date, id, name, "食品工業", metric, value));
            };
            push("CashFlowsFromOperatingActivities", ocf);
            push("PropertyAndPlantAndEquipment", -30.0);
            push("ProceedsFromLongTermDebt", 0.0);
            push("RepaymentOfLongTermDebt", 5.0);
        }
    }
    out
}

fn report() -> BestStockReport {
    let table = reshape(&records()).unwrap();
    let config = EvaluationConfig::default();
    let [balance, income, cashflow] = RuleCategory::all().map(|category| {
        rule_set(category)
            .evaluate(&table, &config)
            .unwrap()
            .ranking
    });

    BestStockReport::new("食品工業", &balance, &income, &cashflow, config.top_n)
}

#[test]
fn test_best_stock_report_workflow() {
    let report = report();

    assert_eq!(report.cashflow.len(), 2);
    assert_eq!(report.cashflow.rows[0].stock_id, "1216");
    // balance and income metrics are absent, so every stock fails but is still listed
    assert!(report.balance.rows.iter().all(|r| r.pass_rate == 0.0));

    let md = report.to_markdown();
    assert!(md.contains("## Top ranked stocks: 食品工業"));
    assert!(md.contains("### Cash Flow Ranking"));
    assert!(md.contains("| 1216 | 統一 | 100% | 90.00 | -5.00 |"));

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("Cash Flow Ranking"));
    assert!(ascii.contains("1227"));
}

#[test]
fn test_heatmap_renders_labels() {
    let table = reshape(&records()).unwrap();
    let eval = rule_set(RuleCategory::CashFlow)
        .evaluate(&table, &EvaluationConfig::default())
        .unwrap();

    let md = eval.heatmap.to_markdown();
    assert!(md.starts_with("| stock | 2020-03-31 | 2020-06-30 |"));
    assert!(md.contains("| 統一 (1216)  —  100% | 1 | 1 |"));

    let csv = eval.heatmap.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.lines().nth(1).unwrap().ends_with(",1,1"));
}

#[rstest]
#[case(ExportFormat::Csv, "category,rank")]
#[case(ExportFormat::Json, "\"industry\":\"食品工業\"")]
#[case(ExportFormat::PrettyJson, "\"industry\": \"食品工業\"")]
fn test_report_export_formats(#[case] format: ExportFormat, #[case] expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("best.{}", format.extension()));

    report().export_to_file(&path, format).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(expected), "{}", content);
}
