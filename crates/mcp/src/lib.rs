// MCP (Model Context Protocol) server exposing the dataset tools and
// resources to agent clients

pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;
