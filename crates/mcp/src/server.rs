// MCP server: JSON-RPC dispatch, served over newline-delimited stdio or HTTP

use crate::error::McpError;
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListResourcesResult, ListToolsResult, ReadResourceParams,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability, JSONRPC_VERSION,
    PROTOCOL_VERSION,
};
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub struct McpServer {
    info: ServerInfo,
    tools: ToolRegistry,
    resources: ResourceRegistry,
}

impl McpServer {
    pub fn new(info: ServerInfo, tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self {
            info,
            tools,
            resources,
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.tools.list_schemas(),
        }
    }

    /// Serve on stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!(
            "MCP server {} v{} ready on stdio",
            self.info.name,
            self.info.version
        );
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await?;
        tracing::info!("Transport closed, shutting down");
        Ok(())
    }

    /// Read one request per line, write one response per line.
    ///
    /// Only transport failures end the loop. Undecodable lines get a parse error.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .await
                .context("Failed to read request")?;
            if read == 0 {
                break;
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut payload =
                    serde_json::to_vec(&response).context("Failed to serialize response")?;
                payload.push(b'\n');
                writer
                    .write_all(&payload)
                    .await
                    .context("Failed to write response")?;
                writer.flush().await.context("Failed to flush response")?;
            }
        }
        Ok(())
    }

    /// Parse and handle one raw message
    pub async fn handle_message(&self, message: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                tracing::warn!("Unparseable request: {}", e);
                Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ))
            }
        }
    }

    /// Route a request; notifications produce no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %request.method, "Received request");

        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Notification");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => to_value(&self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => to_value(&ListResourcesResult {
                resources: self.resources.list_schemas(),
            }),
            "resources/read" => self.read_resource(request.params),
            method => {
                tracing::warn!("Unknown method: {}", method);
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::method_not_found(method),
                ));
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                match &e {
                    McpError::Internal(cause) => {
                        tracing::error!(method = %request.method, "Internal failure: {:#}", cause)
                    }
                    other => tracing::warn!(method = %request.method, "{}", other),
                }
                JsonRpcResponse::error(id, e.to_rpc_error())
            }
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = parse_params("initialize", params)?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                "Client {} v{} connected (protocol {})",
                client.name,
                client.version,
                params.protocol_version
            );
        }

        to_value(&InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                resources: Some(ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: CallToolParams = parse_params("tools/call", params)?;
        let result = self.tools.invoke(&params.name, &params.arguments).await?;
        to_value(&result)
    }

    fn read_resource(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: ReadResourceParams = parse_params("resources/read", params)?;
        let result = self.resources.read(&params.uri)?;
        to_value(&result)
    }
}

fn parse_params<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T, McpError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| McpError::invalid_arguments(method, e.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value).context("Failed to serialize result")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CallToolResult;
    use crate::resources::{SchemaResource, SCHEMA_URI};
    use crate::tools::{dataset_tools, ParamSpec, Tool};
    use file_analyzer_core::sample::bootstrap;
    use file_analyzer_core::FileStore;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct PanickingTool;

    #[async_trait::async_trait]
    impl Tool for PanickingTool {
        fn name(&self) -> &str {
            "explode"
        }

        fn description(&self) -> String {
            "Always panics".to_string()
        }

        fn params(&self) -> Vec<ParamSpec> {
            Vec::new()
        }

        async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
            let outcome = tokio::task::spawn_blocking(|| -> String { panic!("boom") })
                .await
                .context("Tool task did not complete")?;
            Ok(CallToolResult::text(outcome))
        }
    }

    fn server() -> (TempDir, McpServer) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp_dir.path()).unwrap());
        bootstrap(&store).unwrap();

        let mut tools = ToolRegistry::new();
        for tool in dataset_tools(store) {
            tools.register(tool).unwrap();
        }
        tools.register(Arc::new(PanickingTool)).unwrap();

        let mut resources = ResourceRegistry::new();
        resources.register(Arc::new(SchemaResource)).unwrap();

        let info = ServerInfo {
            name: "test".to_string(),
            version: "0.0.0".to_string(),
        };
        (temp_dir, McpServer::new(info, tools, resources))
    }

    async fn call(server: &McpServer, method: &str, params: Value) -> JsonRpcResponse {
        server
            .handle_request(JsonRpcRequest::new(1, method, params))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_advertises_capabilities() {
        let (_dir, server) = server();
        let response = call(
            &server,
            "initialize",
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "client", "version": "1.0"}
            }),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "test");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_discovery() {
        let (_dir, server) = server();

        let tools = call(&server, "tools/list", json!({})).await.result.unwrap();
        assert_eq!(tools["tools"][0]["name"], "list_data_files");
        assert!(tools["tools"][1]["inputSchema"]["properties"]["filename"].is_object());

        let resources = call(&server, "resources/list", json!({}))
            .await
            .result
            .unwrap();
        assert_eq!(resources["resources"][0]["uri"], SCHEMA_URI);
    }

    #[tokio::test]
    async fn test_tool_call_returns_single_text_item() {
        let (_dir, server) = server();
        let response = call(
            &server,
            "tools/call",
            json!({"name": "summarize_csv_file", "arguments": {"filename": "sample.csv"}}),
        )
        .await;

        let result = response.result.unwrap();
        let content = result["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert!(content[0]["text"].as_str().unwrap().contains("5 rows and 4 columns"));
    }

    #[tokio::test]
    async fn test_domain_error_is_a_result() {
        let (_dir, server) = server();
        let response = call(
            &server,
            "tools/call",
            json!({"name": "summarize_csv_file", "arguments": {"filename": "missing.csv"}}),
        )
        .await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_protocol_errors_are_faults() {
        let (_dir, server) = server();

        let unknown_tool = call(&server, "tools/call", json!({"name": "nope"})).await;
        assert_eq!(unknown_tool.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

        let bad_args = call(
            &server,
            "tools/call",
            json!({"name": "create_sample_data", "arguments": {"filename": "a.csv", "rows": "lots"}}),
        )
        .await;
        assert_eq!(bad_args.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

        let unknown_resource = call(&server, "resources/read", json!({"uri": "data://nope"})).await;
        assert_eq!(
            unknown_resource.error.unwrap().code,
            JsonRpcError::RESOURCE_NOT_FOUND
        );

        let unknown_method = call(&server, "tools/delete", json!({})).await;
        assert_eq!(
            unknown_method.error.unwrap().code,
            JsonRpcError::METHOD_NOT_FOUND
        );

        let missing_params = server
            .handle_request(JsonRpcRequest {
                params: None,
                ..JsonRpcRequest::new(2, "resources/read", Value::Null)
            })
            .await
            .unwrap();
        assert_eq!(
            missing_params.error.unwrap().code,
            JsonRpcError::INVALID_PARAMS
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_failure() {
        let (_dir, server) = server();
        let response = call(&server, "tools/call", json!({"name": "explode"})).await;

        let error = response.error.unwrap();
        assert_eq!(error.code, JsonRpcError::INTERNAL_ERROR);
        assert!(!error.message.contains("boom"));

        // The server keeps answering afterwards
        let ping = call(&server, "ping", json!({})).await;
        assert!(ping.result.is_some());
    }

    #[tokio::test]
    async fn test_schema_resource_read() {
        let (_dir, server) = server();
        let first = call(&server, "resources/read", json!({"uri": SCHEMA_URI})).await;
        let second = call(&server, "resources/read", json!({"uri": SCHEMA_URI})).await;

        let first = first.result.unwrap();
        assert_eq!(first, second.result.unwrap());
        assert_eq!(first["contents"][0]["mimeType"], "application/json");
        assert!(first["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("supported_formats"));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let (_dir, server) = server();
        let response = server
            .handle_request(JsonRpcRequest::notification("notifications/initialized"))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_serve_over_stream() {
        let (_dir, server) = server();
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "",
            "this is not json",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","id":"two","method":"tools/call","params":{"name":"list_data_files"}}"#,
        ]
        .join("\n");

        let mut output = Vec::new();
        server
            .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(responses[2]["id"], "two");
        assert_eq!(
            responses[2]["result"]["content"][0]["text"],
            "Available data files: sample.csv, sample.parquet"
        );
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8() {
        let (_dir, server) = server();
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\r\n");

        let mut output = Vec::new();
        server
            .serve(tokio::io::BufReader::new(input.as_slice()), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(responses[2]["id"], 2);
        assert!(responses[2]["result"].is_object());
    }
}
