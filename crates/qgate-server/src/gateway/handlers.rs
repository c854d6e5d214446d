//! HTTP handlers for the gateway API.

use axum::{extract::State, Json};
use qgate_core::{format_report, GatewayError};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::QueryFailure;
use super::state::AppState;

/// Body of `POST /query`. `port` may be a string or a number.
#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub ip: Option<Value>,
    #[serde(default)]
    pub port: Option<Value>,
}

fn required(value: Option<Value>, field: &str) -> Result<String, GatewayError> {
    let text = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        return Err(GatewayError::BadRequest(format!("missing field `{field}`")));
    }
    Ok(text)
}

/// GET /health
pub async fn health_check() -> &'static str {
    "ok"
}

/// POST /query
///
/// Runs one resolver call and returns the rendered report as `text/plain`.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<String, QueryFailure> {
    let request_id = state.next_request_id();

    let (ip, port) = match (required(request.ip, "ip"), required(request.port, "port")) {
        (Ok(ip), Ok(port)) => (ip, port),
        (Err(e), _) | (_, Err(e)) => {
            warn!(request_id, error = %e, "rejected query");
            return Err(e.into());
        }
    };

    info!(request_id, ip = %ip, port = %port, "query received");

    match state.resolver.query(&ip, &port).await {
        Ok(server_info) => {
            let report = format_report(&server_info, state.locale);
            debug!(request_id, report = %report, "rendered report");
            if let Ok(json) = serde_json::to_string_pretty(&server_info) {
                debug!(request_id, server_info = %json, "server info");
            }
            info!(
                request_id,
                name = %server_info.name,
                players = server_info.current_players,
                max_players = server_info.max_players,
                "query succeeded"
            );
            Ok(report)
        }
        Err(e) => {
            match &e {
                GatewayError::Subprocess(stderr) => {
                    warn!(request_id, stderr = %stderr, "resolver execution failed")
                }
                GatewayError::Parse(detail) => {
                    warn!(request_id, error = %detail, "failed to parse resolver output")
                }
                GatewayError::Domain(message) => {
                    info!(request_id, error = %message, "query failed")
                }
                GatewayError::Timeout(limit) => {
                    warn!(request_id, timeout_secs = limit.as_secs(), "resolver timed out")
                }
                other => warn!(request_id, error = %other, "query error"),
            }
            Err(e.into())
        }
    }
}
