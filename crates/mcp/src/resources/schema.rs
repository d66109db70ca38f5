// data://schema: supported formats and the seed file layout

use super::Resource;
use crate::protocol::ResourceSchema;
use anyhow::{Context, Result};
use file_analyzer_core::DataFormat;
use serde::Serialize;

pub const SCHEMA_URI: &str = "data://schema";

#[derive(Debug, Serialize)]
struct SchemaInfo {
    description: &'static str,
    supported_formats: Vec<&'static str>,
    sample_structure: SampleStructure,
}

/// Field layout of the seeded `sample` files, in column order
#[derive(Debug, Serialize)]
struct SampleStructure {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    signup_date: &'static str,
}

/// Static description of what the data directory can hold
pub struct SchemaResource;

impl Resource for SchemaResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            uri: SCHEMA_URI.to_string(),
            name: "schema".to_string(),
            description: "Provide schema information for available datasets.".to_string(),
            mime_type: "application/json".to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        let info = SchemaInfo {
            description: "Schema information for data files",
            supported_formats: DataFormat::ALL.iter().map(|f| f.label()).collect(),
            sample_structure: SampleStructure {
                id: "integer - unique identifier",
                name: "string - user name",
                email: "string - email address",
                signup_date: "date - registration date",
            },
        };
        serde_json::to_string_pretty(&info).context("Failed to serialize schema information")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_stable_structured_text() {
        let first = SchemaResource.read().unwrap();
        let second = SchemaResource.read().unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["supported_formats"], serde_json::json!(["CSV", "Parquet"]));
        assert!(value["description"].is_string());
        assert_eq!(
            value["sample_structure"]["email"],
            "string - email address"
        );
    }

    #[test]
    fn test_keys_keep_declared_order() {
        let text = SchemaResource.read().unwrap();
        let id = text.find("\"id\"").unwrap();
        let signup = text.find("\"signup_date\"").unwrap();
        assert!(id < signup);
    }
}
