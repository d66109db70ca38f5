// Parquet load/save through Arrow record batches

use super::{Column, ColumnData, Table};
use crate::error::TableError;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub(super) fn read(path: &Path) -> Result<Table, TableError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|field| Column::new(field.name().clone(), storage_for(field.data_type())))
        .collect();

    for batch in builder.build()? {
        let batch = batch?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            append(column, array)?;
        }
    }

    Table::new(columns)
}

pub(super) fn write(table: &Table, path: &Path) -> Result<(), TableError> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(c.name.as_str(), arrow_type(&c.data), true))
        .collect();
    let arrays: Vec<ArrayRef> = table.columns().iter().map(|c| to_array(&c.data)).collect();

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Integer and floating columns keep numeric storage; everything else is text
fn storage_for(data_type: &DataType) -> ColumnData {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ColumnData::Int64(Vec::new()),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            ColumnData::Float64(Vec::new())
        }
        _ => ColumnData::Utf8(Vec::new()),
    }
}

fn append(column: &mut Column, array: &ArrayRef) -> Result<(), TableError> {
    match &mut column.data {
        ColumnData::Int64(values) => {
            let converted = cast(array.as_ref(), &DataType::Int64)?;
            let ints = converted
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| TableError::Decode {
                    column: column.name.clone(),
                    expected: "int64",
                })?;
            values.extend(ints.iter());
        }
        ColumnData::Float64(values) => {
            let converted = cast(array.as_ref(), &DataType::Float64)?;
            let floats = converted
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| TableError::Decode {
                    column: column.name.clone(),
                    expected: "float64",
                })?;
            values.extend(floats.iter());
        }
        ColumnData::Utf8(values) => {
            for row in 0..array.len() {
                if array.is_null(row) {
                    values.push(None);
                } else {
                    values.push(Some(array_value_to_string(array.as_ref(), row)?));
                }
            }
        }
    }
    Ok(())
}

fn arrow_type(data: &ColumnData) -> DataType {
    match data {
        ColumnData::Int64(_) => DataType::Int64,
        ColumnData::Float64(_) => DataType::Float64,
        ColumnData::Utf8(_) => DataType::Utf8,
    }
}

fn to_array(data: &ColumnData) -> ArrayRef {
    match data {
        ColumnData::Int64(v) => Arc::new(Int64Array::from(v.clone())),
        ColumnData::Float64(v) => Arc::new(Float64Array::from(v.clone())),
        ColumnData::Utf8(v) => Arc::new(StringArray::from(v.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_narrow_integers_widen_to_int64() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("narrow.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(arrow::array::Int32Array::from(vec![1, 2, 3])) as ArrayRef],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = read(&path).unwrap();
        assert_eq!(
            table.columns()[0].data,
            ColumnData::Int64(vec![Some(1), Some(2), Some(3)])
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();

        assert!(matches!(read(&path), Err(TableError::Parquet(_))));
    }
}
