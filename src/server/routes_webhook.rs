use crate::server::AppContext;
use crate::strm::codec::ensure_absolute;
use crate::strm::{GenerationCounts, GenerationResult};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Body fields accepted as the root path, in order of preference.
/// CloudSaver and similar senders disagree on the name.
pub const PATH_FIELDS: [&str; 4] = ["path", "full_path", "folder_name", "savepath"];

type ErrorResponse = (StatusCode, Json<Value>);

pub fn webhook_routes() -> Router<AppContext> {
    Router::new()
        .route("/strm", post(handle_strm))
        .route("/strm/direct", post(handle_strm_direct))
}

#[derive(Debug, Serialize)]
struct GenerationResponse {
    code: u16,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(flatten)]
    counts: GenerationCounts,
    details: GenerationResult,
}

impl GenerationResponse {
    fn new(message: &'static str, path: Option<String>, result: GenerationResult) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message,
            path,
            counts: result.counts(),
            details: result,
        }
    }
}

/// Parse a webhook body leniently: anything that is not JSON counts as `{}`.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| json!({}))
}

/// First non-empty string among [`PATH_FIELDS`].
pub fn resolve_path(payload: &Value) -> Option<String> {
    PATH_FIELDS
        .iter()
        .filter_map(|field| payload.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(ensure_absolute)
}

async fn handle_strm(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<impl IntoResponse, ErrorResponse> {
    let payload = parse_body(&body);

    let Some(path) = resolve_path(&payload) else {
        tracing::warn!("Webhook request without a path parameter: {}", payload);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": 400,
                "message": "missing path parameter",
                "hint": "include a `path` field holding the AList directory to scan",
                "received_data": payload,
            })),
        ));
    };

    tracing::info!("Received webhook request: path={}", path);
    tracing::debug!("Raw webhook payload: {}", payload);

    let result = ctx.generator.generate(&path).await;
    Ok(Json(GenerationResponse::new(
        "strm generation complete",
        Some(path),
        result,
    )))
}

async fn handle_strm_direct(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<impl IntoResponse, ErrorResponse> {
    let payload = parse_body(&body);

    let entries = payload
        .get("files")
        .and_then(Value::as_array)
        .filter(|files| !files.is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"code": 400, "message": "missing files parameter"})),
            )
        })?;

    let mut files = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for entry in entries {
        match entry.as_str() {
            Some(file) if !file.trim().is_empty() => files.push(file.trim().to_string()),
            _ => rejected.push(format!("invalid file entry: {}", entry)),
        }
    }

    tracing::info!("Received direct webhook request: {} file(s)", files.len());

    let mut result = ctx.generator.generate_files(&files).await;
    for message in rejected {
        result.record_error(message);
    }

    Ok(Json(GenerationResponse::new(
        "strm direct generation complete",
        None,
        result,
    )))
}
