//! The normalized report shape every aggregator produces.

use serde::Serialize;
use std::fmt;

/// One table cell. Rows are positionally aligned with the header list, so a
/// cell only knows its value, not its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(u64),
    Num(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Num(x) => write!(f, "{x:.2}"),
        }
    }
}

/// Bar-chart series mirroring the table: `labels[i]` pairs with `data[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChartConfig {
    pub labels: Vec<String>,
    pub series_label: String,
    pub data: Vec<f64>,
}

impl ChartConfig {
    pub fn new(series_label: &str) -> Self {
        Self {
            labels: Vec::new(),
            series_label: series_label.to_string(),
            data: Vec::new(),
        }
    }
}

/// Column headers, positionally aligned rows, and the chart series derived
/// from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub chart: ChartConfig,
}

impl Report {
    /// An empty report: headers intact, zero rows, empty chart series.
    pub fn empty(headers: &[&str], series_label: &str) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
            chart: ChartConfig::new(series_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Text("Van".into()).to_string(), "Van");
        assert_eq!(Cell::Int(7).to_string(), "7");
        assert_eq!(Cell::Num(8.0).to_string(), "8.00");
        assert_eq!(Cell::Num(12.345).to_string(), "12.35");
    }

    #[test]
    fn test_cell_serializes_untagged() {
        let row = vec![Cell::Text("Van".into()), Cell::Int(3)];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["Van",3]"#);
    }

    #[test]
    fn test_empty_report_keeps_headers() {
        let report = Report::empty(&["Vehicle", "Seatbelt Count"], "Seatbelt");
        assert_eq!(report.headers, vec!["Vehicle", "Seatbelt Count"]);
        assert!(report.rows.is_empty());
        assert_eq!(report.chart.series_label, "Seatbelt");
        assert!(report.chart.data.is_empty());
    }
}
