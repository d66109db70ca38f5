mod registry;
pub mod schema;

pub use registry::{Resource, ResourceRegistry};
pub use schema::{SchemaResource, SCHEMA_URI};
