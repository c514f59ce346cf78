//! Plain-text rendering of tabular results.

use formosa_rules::{HeatmapMatrix, PassRate, RankingTable};

/// Placeholder for a missing value.
pub const MISSING: &str = "n/a";

/// Anything that can be laid out as a header row plus string cells.
pub trait TableView {
    /// Column headers.
    fn headers(&self) -> Vec<String>;

    /// Rows of formatted cells, aligned with [`headers`](Self::headers).
    fn cells(&self) -> Vec<Vec<String>>;

    /// Format as a Markdown (pipe) table.
    fn to_markdown(&self) -> String {
        let headers = self.headers();
        let mut output = String::new();

        output.push_str(&format!("| {} |\n", headers.join(" | ")));
        output.push_str(&format!(
            "|{}|\n",
            headers
                .iter()
                .map(|h| "-".repeat(h.chars().count().max(3) + 2))
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in self.cells() {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }

        output
    }

    /// Format as a fixed-width table for terminal display.
    fn to_ascii_table(&self) -> String {
        let headers = self.headers();
        let rows = self.cells();

        let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut output = String::new();
        output.push_str(&format_row(&headers, &widths));
        output.push_str(&"-".repeat(total));
        output.push('\n');
        for row in &rows {
            output.push_str(&format_row(row, &widths));
        }

        output
    }
}

/// Terminal width of a cell; CJK characters take two columns.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| if (c as u32) >= 0x1100 { 2 } else { 1 })
        .sum()
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = " ".repeat(width.saturating_sub(display_width(cell)));
            // first two columns are ids and names
            if i < 2 {
                format!("{}{}", cell, pad)
            } else {
                format!("{}{}", pad, cell)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

/// Format an optional metric with two decimals.
pub fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.2}", v))
}

impl TableView for RankingTable {
    fn headers(&self) -> Vec<String> {
        self.columns()
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.stock_id.clone(),
                    row.stock_name.clone(),
                    row.passed_pct(),
                ];
                cells.extend(row.metrics.iter().map(|v| format_metric(*v)));
                cells
            })
            .collect()
    }
}

impl TableView for HeatmapMatrix {
    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["stock".to_string()];
        headers.extend(self.periods.iter().cloned());
        headers
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone()];
                cells.extend(row.cells.iter().map(u8::to_string));
                cells
            })
            .collect()
    }
}

impl TableView for [PassRate] {
    fn headers(&self) -> Vec<String> {
        ["stock_id", "stock_name", "passed", "periods", "pass_rate"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|rate| {
                vec![
                    rate.stock_id.clone(),
                    rate.stock_name.clone(),
                    rate.passed.to_string(),
                    rate.periods.to_string(),
                    format!("{:.2}", rate.pass_rate),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formosa_rules::{RankingRow, RuleCategory};

    fn table() -> RankingTable {
        RankingTable {
            category: RuleCategory::CashFlow,
            metric_labels: vec![
                "Avg Free Cash Flow".to_string(),
                "Avg Net Debt Change".to_string(),
            ],
            rows: vec![
                RankingRow {
                    stock_id: "2912".to_string(),
                    stock_name: "統一超".to_string(),
                    pass_rate: 0.75,
                    metrics: vec![Some(30.0), Some(-10.0)],
                },
                RankingRow {
                    stock_id: "5903".to_string(),
                    stock_name: "全家".to_string(),
                    pass_rate: 0.5,
                    metrics: vec![Some(12.346), None],
                },
            ],
        }
    }

    #[test]
    fn test_ranking_markdown() {
        let md = table().to_markdown();
        let lines: Vec<_> = md.lines().collect();

        assert_eq!(
            lines[0],
            "| stock_id | stock_name | % Passed | Avg Free Cash Flow | Avg Net Debt Change |"
        );
        assert!(lines[1].starts_with("|---"));
        assert_eq!(lines[2], "| 2912 | 統一超 | 75% | 30.00 | -10.00 |");
        assert_eq!(lines[3], "| 5903 | 全家 | 50% | 12.35 | n/a |");
    }

    #[test]
    fn test_ranking_ascii_alignment() {
        let ascii = table().to_ascii_table();
        let lines: Vec<_> = ascii.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("2912      統一超"));
        assert!(lines[3].ends_with("n/a"));
    }

    #[test]
    fn test_pass_rate_view() {
        let rates = vec![PassRate {
            stock_id: "2912".to_string(),
            stock_name: "統一超".to_string(),
            passed: 3,
            periods: 4,
            pass_rate: 0.75,
        }];

        let md = rates.as_slice().to_markdown();
        assert!(md.contains("| 2912 | 統一超 | 3 | 4 | 0.75 |"));
    }

    #[test]
    fn test_display_width_counts_cjk_double() {
        assert_eq!(display_width("2912"), 4);
        assert_eq!(display_width("統一超"), 6);
    }
}
