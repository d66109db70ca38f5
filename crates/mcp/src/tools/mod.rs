pub mod dataset;
mod registry;

pub use dataset::{
    dataset_tools, AnalyzeDataTool, CreateSampleDataTool, ListDataFilesTool, SummarizeFileTool,
};
pub use registry::{
    json_schema_integer, json_schema_object, json_schema_string, validate_arguments, ParamKind,
    ParamSpec, Tool, ToolRegistry,
};
