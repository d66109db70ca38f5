// HTTP transport: the same JSON-RPC dispatch behind an axum router

use crate::protocol::ListToolsResult;
use crate::server::McpServer;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Serve JSON-RPC over HTTP until the listener fails
pub async fn serve(addr: &str, server: Arc<McpServer>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("MCP server listening on http://{}", addr);

    axum::serve(listener, router(server))
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// `POST /mcp` takes one JSON-RPC message; `/tools` and `/health` are plain GETs
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/tools", get(list_tools))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn handle_rpc(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        // Notifications are acknowledged without a body
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn list_tools(State(server): State<Arc<McpServer>>) -> Json<ListToolsResult> {
    Json(server.list_tools())
}

async fn health_check(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    let info = server.info();
    Json(serde_json::json!({
        "status": "ok",
        "service": info.name,
        "version": info.version,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{JsonRpcError, ServerInfo};
    use crate::resources::{ResourceRegistry, SchemaResource};
    use crate::tools::{dataset_tools, ToolRegistry};
    use axum::body::Body;
    use axum::http::Request;
    use file_analyzer_core::sample::bootstrap;
    use file_analyzer_core::FileStore;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (TempDir, Router) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp_dir.path()).unwrap());
        bootstrap(&store).unwrap();

        let mut tools = ToolRegistry::new();
        for tool in dataset_tools(store) {
            tools.register(tool).unwrap();
        }
        let mut resources = ResourceRegistry::new();
        resources.register(Arc::new(SchemaResource)).unwrap();

        let info = ServerInfo {
            name: "file_analyzer_server".to_string(),
            version: "0.0.0".to_string(),
        };
        let server = Arc::new(McpServer::new(info, tools, resources));
        (temp_dir, router(server))
    }

    async fn post_rpc(app: Router, body: impl Into<Body>) -> (StatusCode, Bytes) {
        let response = app
            .oneshot(
                Request::post("/mcp")
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    #[tokio::test]
    async fn test_tool_call_over_http() {
        let (_dir, app) = app();
        let (status, body) = post_rpc(
            app,
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"summarize_parquet_file","arguments":{"filename":"sample.parquet"}}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["id"], 7);
        assert!(response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("5 rows and 4 columns"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (_dir, app) = app();
        let (status, body) = post_rpc(app, b"\xff not json".to_vec()).await;

        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], JsonRpcError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let (_dir, app) = app();
        let (status, body) = post_rpc(
            app,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_tools_and_health_endpoints() {
        let (_dir, app) = app();

        let response = app
            .clone()
            .oneshot(Request::get("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let tools: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tools["tools"].as_array().unwrap().len(), 6);
        assert_eq!(tools["tools"][0]["name"], "list_data_files");

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["service"], "file_analyzer_server");
    }
}
