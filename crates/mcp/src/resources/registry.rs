// Resource registry: URI lookup for readable, argument-free content

use crate::error::{McpError, McpResult};
use crate::protocol::{ReadResourceResult, ResourceContents, ResourceSchema};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Content provider exposed under a fixed URI
pub trait Resource: Send + Sync {
    fn schema(&self) -> ResourceSchema;

    fn read(&self) -> Result<String>;
}

/// Resource registry, in registration order
pub struct ResourceRegistry {
    resources: Vec<Arc<dyn Resource>>,
    index: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a resource; URIs must be unique
    pub fn register(&mut self, resource: Arc<dyn Resource>) -> McpResult<()> {
        let uri = resource.schema().uri;
        if self.index.contains_key(&uri) {
            return Err(McpError::DuplicateRegistration(uri));
        }
        self.index.insert(uri, self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, uri: &str) -> Option<Arc<dyn Resource>> {
        self.index.get(uri).map(|&i| self.resources[i].clone())
    }

    pub fn list_schemas(&self) -> Vec<ResourceSchema> {
        self.resources.iter().map(|r| r.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn read(&self, uri: &str) -> McpResult<ReadResourceResult> {
        let resource = self
            .get(uri)
            .ok_or_else(|| McpError::UnknownResource(uri.to_string()))?;
        let schema = resource.schema();
        let text = resource.read()?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: schema.uri,
                mime_type: schema.mime_type,
                text,
            }],
        })
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
