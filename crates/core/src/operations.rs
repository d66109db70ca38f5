// Dataset operations exposed as tools.
//
// Each operation loads what it needs from the store, computes its answer and
// returns either the rendered text or a `DatasetError`. Nothing is cached
// between calls.

use crate::error::{DatasetError, DatasetResult};
use crate::sample::{generate_sample_table, SAMPLE_COLUMNS};
use crate::storage::FileStore;
use crate::table::Table;
use crate::types::{AnalyzeOperation, DataFormat};
use chrono::{Local, NaiveDate};
use rand::Rng;

/// Rows shown by the `head` analysis
pub const HEAD_ROWS: usize = 5;

/// Rows generated when the caller does not say
pub const DEFAULT_SAMPLE_ROWS: usize = 10;

/// List every regular file in the store
pub fn list_files(store: &FileStore) -> String {
    let files = store.list_files().unwrap_or_else(|e| {
        tracing::warn!("Failed to list data directory: {:#}", e);
        Vec::new()
    });

    if files.is_empty() {
        "No data files found in the data directory.".to_string()
    } else {
        format!("Available data files: {}", files.join(", "))
    }
}

/// Report row and column counts plus column names
pub fn summarize(store: &FileStore, format: DataFormat, filename: &str) -> DatasetResult {
    let table = load(store, format, filename)?;
    Ok(format!(
        "{} file '{}' has {} rows and {} columns. Columns: {}",
        format,
        filename,
        table.row_count(),
        table.column_count(),
        table.column_names().join(", ")
    ))
}

/// Run one of the analysis modes (`describe`, `head`, `info`, `columns`)
pub fn analyze(
    store: &FileStore,
    format: DataFormat,
    filename: &str,
    operation: &str,
) -> DatasetResult {
    let table = load(store, format, filename)?;
    let operation: AnalyzeOperation = operation
        .parse()
        .map_err(|operation| DatasetError::UnknownOperation { operation })?;
    tracing::debug!(%operation, filename, "Analyzing");

    let text = match operation {
        AnalyzeOperation::Describe => {
            format!("Statistical description of {}:\n{}", filename, table.describe())
        }
        AnalyzeOperation::Head => format!(
            "First {} rows of {}:\n{}",
            HEAD_ROWS,
            filename,
            table.head(HEAD_ROWS).to_grid()
        ),
        AnalyzeOperation::Info => format!(
            "Info for {}:\nShape: ({}, {})\nColumns: [{}]\nData types:\n{}",
            filename,
            table.row_count(),
            table.column_count(),
            table.column_names().join(", "),
            table.dtypes_text()
        ),
        AnalyzeOperation::Columns => format!(
            "Columns in {}: {}",
            filename,
            table.column_names().join(", ")
        ),
    };

    Ok(text)
}

/// Generate a synthetic dataset and write it in the format implied by `filename`
pub fn create(store: &FileStore, filename: &str, rows: usize) -> DatasetResult {
    create_with(
        store,
        filename,
        rows,
        &mut rand::thread_rng(),
        Local::now().date_naive(),
    )
}

/// `create` with an injected random source and reference date
pub fn create_with<R: Rng>(
    store: &FileStore,
    filename: &str,
    rows: usize,
    rng: &mut R,
    today: NaiveDate,
) -> DatasetResult {
    let format = DataFormat::from_filename(filename).ok_or_else(|| {
        DatasetError::UnsupportedFormat {
            filename: filename.to_string(),
        }
    })?;
    let path = store
        .locate(filename)
        .ok_or_else(|| DatasetError::not_found(filename))?;

    let write_failure = |source| DatasetError::WriteFailure {
        filename: filename.to_string(),
        source,
    };
    let table = generate_sample_table(rows, rng, today).map_err(write_failure)?;
    table.save(&path, format).map_err(write_failure)?;

    tracing::info!(filename, rows, "Created sample dataset");
    Ok(format!(
        "Created {} with {} rows and {} columns.",
        filename,
        rows,
        SAMPLE_COLUMNS.len()
    ))
}

fn load(store: &FileStore, format: DataFormat, filename: &str) -> Result<Table, DatasetError> {
    if !store.exists(filename) {
        return Err(DatasetError::not_found(filename));
    }

    Table::load(&store.resolve(filename), format).map_err(|source| DatasetError::LoadFailure {
        format,
        filename: filename.to_string(),
        source,
    })
}
