// Descriptive statistics over table columns

use super::render::{format_stat, TextGrid};
use super::{Column, ColumnData, Table};
use std::collections::HashMap;

const NUMERIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const TEXT_LABELS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Summary statistics for one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarize non-null values; undefined statistics are NaN
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.retain(|v| !v.is_nan());
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = if count == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / count as f64
        };
        let std = if count < 2 {
            f64::NAN
        } else {
            let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squared / (count - 1) as f64).sqrt()
        };

        Self {
            count,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }

    fn cells(&self) -> Vec<String> {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
        .iter()
        .map(|v| format_stat(*v))
        .collect()
    }
}

/// Linear-interpolated quantile over sorted values
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Build the describe grid: numeric columns if any exist, text columns otherwise
pub fn describe(table: &Table) -> TextGrid {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.data.is_numeric())
        .collect();

    if !numeric.is_empty() {
        let mut grid = TextGrid::new(NUMERIC_LABELS.iter().map(|s| s.to_string()).collect());
        for column in numeric {
            let summary = NumericSummary::from_values(column.data.numeric_values());
            grid.push_column(column.name.clone(), summary.cells());
        }
        return grid;
    }

    let mut grid = TextGrid::new(TEXT_LABELS.iter().map(|s| s.to_string()).collect());
    for column in table.columns() {
        if let ColumnData::Utf8(values) = &column.data {
            grid.push_column(column.name.clone(), text_summary(values));
        }
    }
    grid
}

fn text_summary(values: &[Option<String>]) -> Vec<String> {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut top: Option<(&str, usize)> = None;
    for &value in &present {
        let count = counts.entry(value).or_insert(0);
        *count += 1;
        // First value to reach the highest count wins ties
        if top.map_or(true, |(_, best)| *count > best) {
            top = Some((value, *count));
        }
    }

    vec![
        present.len().to_string(),
        counts.len().to_string(),
        top.map(|(v, _)| v.to_string()).unwrap_or_else(|| "NaN".to_string()),
        top.map(|(_, n)| n.to_string()).unwrap_or_else(|| "NaN".to_string()),
    ]
}
