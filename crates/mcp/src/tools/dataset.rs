// Dataset tools: list, summarize, analyze and create files in the data directory

use crate::protocol::CallToolResult;
use crate::tools::{ParamSpec, Tool};
use anyhow::{Context, Result};
use file_analyzer_core::operations::{self, DEFAULT_SAMPLE_ROWS};
use file_analyzer_core::{AnalyzeOperation, DataFormat, DatasetResult, FileStore};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Largest dataset `create_sample_data` will generate
pub const MAX_SAMPLE_ROWS: i64 = 1_000_000;

/// Run a blocking dataset operation off the async runtime.
///
/// Domain errors come back as flagged text; a panic inside the operation is an
/// internal error.
async fn run_operation<F>(operation: F) -> Result<CallToolResult>
where
    F: FnOnce() -> DatasetResult + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(operation)
        .await
        .context("Dataset operation did not complete")?;

    Ok(match outcome {
        Ok(text) => CallToolResult::text(text),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "{}", e);
            CallToolResult::error(e.to_string())
        }
    })
}

fn filename_param(example: DataFormat) -> ParamSpec {
    let description = match example {
        DataFormat::Csv => "Name of the CSV file in the data directory (e.g., 'sample.csv')",
        DataFormat::Parquet => {
            "Name of the Parquet file in the data directory (e.g., 'sample.parquet')"
        }
    };
    ParamSpec::string("filename", description)
}

#[derive(Debug, Deserialize)]
struct FileArgs {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    filename: String,
    operation: String,
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    filename: String,
    rows: usize,
}

/// Tool to list the files in the data directory
pub struct ListDataFilesTool {
    store: Arc<FileStore>,
}

impl ListDataFilesTool {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for ListDataFilesTool {
    fn name(&self) -> &str {
        "list_data_files"
    }

    fn description(&self) -> String {
        "List all available data files in the data directory.".to_string()
    }

    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        let store = self.store.clone();
        run_operation(move || Ok(operations::list_files(&store))).await
    }
}

/// Tool to report a file's dimensions and column names
pub struct SummarizeFileTool {
    store: Arc<FileStore>,
    format: DataFormat,
}

impl SummarizeFileTool {
    pub fn new(store: Arc<FileStore>, format: DataFormat) -> Self {
        Self { store, format }
    }
}

#[async_trait::async_trait]
impl Tool for SummarizeFileTool {
    fn name(&self) -> &str {
        match self.format {
            DataFormat::Csv => "summarize_csv_file",
            DataFormat::Parquet => "summarize_parquet_file",
        }
    }

    fn description(&self) -> String {
        format!(
            "Summarize a {} file by reporting its number of rows and columns.",
            self.format
        )
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![filename_param(self.format)]
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: FileArgs = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.name()))?;

        let store = self.store.clone();
        let format = self.format;
        run_operation(move || operations::summarize(&store, format, &args.filename)).await
    }
}

/// Tool to run statistical analyses over a file
pub struct AnalyzeDataTool {
    store: Arc<FileStore>,
    format: DataFormat,
}

impl AnalyzeDataTool {
    pub fn new(store: Arc<FileStore>, format: DataFormat) -> Self {
        Self { store, format }
    }
}

#[async_trait::async_trait]
impl Tool for AnalyzeDataTool {
    fn name(&self) -> &str {
        match self.format {
            DataFormat::Csv => "analyze_csv_data",
            DataFormat::Parquet => "analyze_parquet_data",
        }
    }

    fn description(&self) -> String {
        format!(
            "Perform advanced analysis on a {} file. Operations: {}.",
            self.format,
            AnalyzeOperation::available()
        )
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            filename_param(self.format),
            ParamSpec::string(
                "operation",
                "Type of analysis ('describe', 'head', 'info', 'columns')",
            )
            .with_default(AnalyzeOperation::default().as_str()),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: AnalyzeArgs = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.name()))?;

        let store = self.store.clone();
        let format = self.format;
        run_operation(move || {
            operations::analyze(&store, format, &args.filename, &args.operation)
        })
        .await
    }
}

/// Tool to generate a synthetic dataset
pub struct CreateSampleDataTool {
    store: Arc<FileStore>,
}

impl CreateSampleDataTool {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for CreateSampleDataTool {
    fn name(&self) -> &str {
        "create_sample_data"
    }

    fn description(&self) -> String {
        "Create a new sample dataset. The filename suffix (.csv or .parquet) selects the format."
            .to_string()
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filename", "Name for the new file (e.g., 'new_data.csv')"),
            ParamSpec::integer("rows", "Number of rows to generate", 0, MAX_SAMPLE_ROWS)
                .with_default(DEFAULT_SAMPLE_ROWS),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CreateArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for create_sample_data")?;

        let store = self.store.clone();
        run_operation(move || operations::create(&store, &args.filename, args.rows)).await
    }
}

/// Every dataset tool, in the order they are advertised
pub fn dataset_tools(store: Arc<FileStore>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListDataFilesTool::new(store.clone())),
        Arc::new(SummarizeFileTool::new(store.clone(), DataFormat::Csv)),
        Arc::new(SummarizeFileTool::new(store.clone(), DataFormat::Parquet)),
        Arc::new(AnalyzeDataTool::new(store.clone(), DataFormat::Csv)),
        Arc::new(AnalyzeDataTool::new(store.clone(), DataFormat::Parquet)),
        Arc::new(CreateSampleDataTool::new(store)),
    ]
}
