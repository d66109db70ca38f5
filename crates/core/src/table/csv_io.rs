// CSV load/save with per-column type inference

use super::{Column, ColumnData, Table};
use crate::error::TableError;
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_column(raw)))
        .collect();
    Table::new(columns)
}

pub(super) fn write(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        writer.write_record(
            table
                .columns()
                .iter()
                .map(|c| c.data.cell(row).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Narrowest type that fits every non-empty cell: int64, then float64, then text
fn infer_column(raw: Vec<String>) -> ColumnData {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if !present.is_empty() && present.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnData::Int64(raw.iter().map(|s| s.trim().parse().ok()).collect());
    }
    if !present.is_empty() && present.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnData::Float64(raw.iter().map(|s| s.trim().parse().ok()).collect());
    }

    ColumnData::Utf8(
        raw.into_iter()
            .map(|s| if s.is_empty() { None } else { Some(s) })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infers_column_types() {
        assert_eq!(
            infer_column(strings(&["1", "", " 3"])),
            ColumnData::Int64(vec![Some(1), None, Some(3)])
        );
        assert_eq!(
            infer_column(strings(&["1", "2.5"])),
            ColumnData::Float64(vec![Some(1.0), Some(2.5)])
        );
        assert_eq!(
            infer_column(strings(&["a", ""])),
            ColumnData::Utf8(vec![Some("a".to_string()), None])
        );
        assert_eq!(infer_column(Vec::new()), ColumnData::Utf8(Vec::new()));
    }

    #[test]
    fn test_read_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.csv");
        std::fs::write(&path, "id,name\n1,Ann\n2,Bo\n").unwrap();

        let table = read(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.columns()[0].data.dtype(), "int64");
    }

    #[test]
    fn test_ragged_rows_fail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        assert!(matches!(read(&path), Err(TableError::Csv(_))));
    }
}
