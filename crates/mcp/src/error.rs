//! Protocol-level errors.
//!
//! These become JSON-RPC error responses. Dataset failures never show up here;
//! they travel back as tool result text.

use crate::protocol::JsonRpcError;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Arguments failed validation against the tool's declared parameters.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// A second tool or resource was registered under an existing name.
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// Anything a handler did not expect; details stay in the logs.
    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl McpError {
    pub fn invalid_arguments(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Self::UnknownTool(_) | Self::InvalidArguments { .. } => {
                JsonRpcError::invalid_params(self.to_string())
            }
            Self::UnknownResource(uri) => {
                let mut error =
                    JsonRpcError::custom(JsonRpcError::RESOURCE_NOT_FOUND, self.to_string());
                error.data = Some(serde_json::json!({ "uri": uri }));
                error
            }
            Self::DuplicateRegistration(_) | Self::Internal(_) => {
                JsonRpcError::internal_error("Internal error while handling request")
            }
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
