// Synthetic datasets: the create_sample_data table and the startup seed files

use crate::error::TableError;
use crate::storage::FileStore;
use crate::table::{Column, ColumnData, Table};
use crate::types::DataFormat;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

pub const SAMPLE_COLUMNS: [&str; 5] = ["id", "name", "score", "category", "created_date"];
pub const SEED_STEM: &str = "sample";

const CATEGORIES: [&str; 3] = ["A", "B", "C"];

/// Generate `rows` synthetic records dated up to a year before `today`
pub fn generate_sample_table<R: Rng>(
    rows: usize,
    rng: &mut R,
    today: NaiveDate,
) -> Result<Table, TableError> {
    let ids: Vec<Option<i64>> = (1..=rows as i64).map(Some).collect();
    let names = (1..=rows).map(|i| Some(format!("User_{}", i))).collect();
    let scores = (0..rows).map(|_| Some(rng.gen_range(1..=100))).collect();
    let categories = (0..rows)
        .map(|_| CATEGORIES.choose(&mut *rng).map(|c| c.to_string()))
        .collect();
    let dates = (0..rows)
        .map(|_| {
            let offset = Duration::days(rng.gen_range(1..=365));
            Some((today - offset).format("%Y-%m-%d").to_string())
        })
        .collect();

    Table::new(vec![
        Column::new(SAMPLE_COLUMNS[0], ColumnData::Int64(ids)),
        Column::new(SAMPLE_COLUMNS[1], ColumnData::Utf8(names)),
        Column::new(SAMPLE_COLUMNS[2], ColumnData::Int64(scores)),
        Column::new(SAMPLE_COLUMNS[3], ColumnData::Utf8(categories)),
        Column::new(SAMPLE_COLUMNS[4], ColumnData::Utf8(dates)),
    ])
}

/// Fixed five-user table written on first start
pub fn seed_table() -> Result<Table, TableError> {
    let users = [
        (1, "Alice Johnson", "alice@example.com", "2023-01-15"),
        (2, "Bob Smith", "bob@example.com", "2023-02-22"),
        (3, "Carol Lee", "carol@example.com", "2023-03-10"),
        (4, "David Wu", "david@example.com", "2023-04-18"),
        (5, "Eva Brown", "eva@example.com", "2023-05-30"),
    ];

    Table::new(vec![
        Column::new("id", ColumnData::Int64(users.iter().map(|u| Some(u.0)).collect())),
        Column::new(
            "name",
            ColumnData::Utf8(users.iter().map(|u| Some(u.1.to_string())).collect()),
        ),
        Column::new(
            "email",
            ColumnData::Utf8(users.iter().map(|u| Some(u.2.to_string())).collect()),
        ),
        Column::new(
            "signup_date",
            ColumnData::Utf8(users.iter().map(|u| Some(u.3.to_string())).collect()),
        ),
    ])
}

/// Write `sample.csv` and `sample.parquet` unless `sample.csv` already exists.
///
/// Returns whether anything was written.
pub fn bootstrap(store: &FileStore) -> Result<bool> {
    let marker = format!("{}.{}", SEED_STEM, DataFormat::Csv.extension());
    if store.exists(&marker) {
        tracing::debug!("Seed data already present");
        return Ok(false);
    }

    let table = seed_table().context("Failed to build seed table")?;
    for format in DataFormat::ALL {
        let filename = format!("{}.{}", SEED_STEM, format.extension());
        table
            .save(&store.resolve(&filename), format)
            .with_context(|| format!("Failed to write seed file {}", filename))?;
    }

    tracing::info!(
        "Created sample data files in {}",
        store.base_path().display()
    );
    Ok(true)
}
