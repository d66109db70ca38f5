use std::path::Path;
use std::str::FromStr;

/// On-disk tabular format, implied by a filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Csv,
    Parquet,
}

impl DataFormat {
    pub const ALL: [DataFormat; 2] = [DataFormat::Csv, DataFormat::Parquet];

    /// Infer the format from a filename's extension; `.CSV` is not `.csv`
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        extension.parse().ok()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Parquet => "parquet",
        }
    }

    /// Human-readable label used in result text
    pub fn label(&self) -> &'static str {
        match self {
            DataFormat::Csv => "CSV",
            DataFormat::Parquet => "Parquet",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(DataFormat::Csv),
            "parquet" => Ok(DataFormat::Parquet),
            other => Err(format!("unsupported format: {}", other)),
        }
    }
}

/// Analysis modes accepted by the analyze operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnalyzeOperation {
    #[default]
    Describe,
    Head,
    Info,
    Columns,
}

impl AnalyzeOperation {
    pub const ALL: [AnalyzeOperation; 4] = [
        AnalyzeOperation::Describe,
        AnalyzeOperation::Head,
        AnalyzeOperation::Info,
        AnalyzeOperation::Columns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzeOperation::Describe => "describe",
            AnalyzeOperation::Head => "head",
            AnalyzeOperation::Info => "info",
            AnalyzeOperation::Columns => "columns",
        }
    }

    /// Comma-separated list of every valid operation name
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for AnalyzeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalyzeOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
