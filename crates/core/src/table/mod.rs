// In-memory table loaded from a CSV or Parquet file

mod csv_io;
mod parquet_io;
pub mod render;
pub mod stats;

use crate::error::TableError;
use crate::types::DataFormat;
use render::{format_float, TextGrid};
use std::path::Path;

/// Typed storage for one column; `None` is a null cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnData::Int64(_) => "int64",
            ColumnData::Float64(_) => "float64",
            ColumnData::Utf8(_) => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Int64(_) | ColumnData::Float64(_))
    }

    /// Non-null values as floats (empty for text columns)
    pub fn numeric_values(&self) -> Vec<f64> {
        match self {
            ColumnData::Int64(v) => v.iter().flatten().map(|x| *x as f64).collect(),
            ColumnData::Float64(v) => v.iter().flatten().copied().collect(),
            ColumnData::Utf8(_) => Vec::new(),
        }
    }

    /// Display text of one cell, `NaN` for nulls
    pub fn display_cell(&self, row: usize) -> String {
        self.cell(row).unwrap_or_else(|| "NaN".to_string())
    }

    /// Raw text of one cell, `None` for nulls or out-of-range rows
    pub fn cell(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Int64(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Float64(v) => v.get(row).copied().flatten().map(format_float),
            ColumnData::Utf8(v) => v.get(row).cloned().flatten(),
        }
    }

    fn truncated(&self, n: usize) -> ColumnData {
        match self {
            ColumnData::Int64(v) => ColumnData::Int64(v.iter().take(n).copied().collect()),
            ColumnData::Float64(v) => ColumnData::Float64(v.iter().take(n).copied().collect()),
            ColumnData::Utf8(v) => ColumnData::Utf8(v.iter().take(n).cloned().collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A rectangular, column-oriented table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting columns of unequal length
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.data.len();
            if let Some(ragged) = columns.iter().find(|c| c.data.len() != expected) {
                return Err(TableError::RaggedColumns {
                    column: ragged.name.clone(),
                    found: ragged.data.len(),
                    expected,
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn load(path: &Path, format: DataFormat) -> Result<Self, TableError> {
        match format {
            DataFormat::Csv => csv_io::read(path),
            DataFormat::Parquet => parquet_io::read(path),
        }
    }

    /// Write the table, replacing `path` only once the whole file is written
    pub fn save(&self, path: &Path, format: DataFormat) -> Result<(), TableError> {
        let staging = staging_path(path);
        let written = match format {
            DataFormat::Csv => csv_io::write(self, &staging),
            DataFormat::Parquet => parquet_io::write(self, &staging),
        };

        match written.and_then(|()| std::fs::rename(&staging, path).map_err(TableError::from)) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = std::fs::remove_file(&staging);
                Err(e)
            }
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column name to dtype, in column order
    pub fn dtypes(&self) -> Vec<(&str, &'static str)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.data.dtype()))
            .collect()
    }

    /// First `n` rows (or fewer)
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.truncated(n)))
                .collect(),
        }
    }

    pub fn describe(&self) -> TextGrid {
        stats::describe(self)
    }

    /// Row-indexed grid of every cell
    pub fn to_grid(&self) -> TextGrid {
        let rows = self.row_count();
        let mut grid = TextGrid::new((0..rows).map(|i| i.to_string()).collect());
        for column in &self.columns {
            let cells = (0..rows).map(|row| column.data.display_cell(row)).collect();
            grid.push_column(column.name.clone(), cells);
        }
        grid
    }

    /// One `name  dtype` line per column
    pub fn dtypes_text(&self) -> String {
        let width = self
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);
        self.dtypes()
            .iter()
            .map(|(name, dtype)| format!("{:<width$}  {}", name, dtype))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn staging_path(path: &Path) -> std::path::PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
