use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures_util::TryStreamExt;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::logging::types::{REQ_TYPE_CHAT_ONCE, REQ_TYPE_CHAT_STREAM};
use crate::providers::openai::OpenAiProvider;
use crate::server::AppState;
use crate::server::effort_resolve::apply_effort_rules;
use crate::server::provider_dispatch::select_provider;
use crate::server::request_logging::log_chat_request;

pub async fn chat_completions(
    State(app_state): State<Arc<AppState>>,
    Json(mut body): Json<Value>,
) -> Result<Response, GatewayError> {
    let start_time = Utc::now();
    let request_id = Uuid::new_v4().to_string();
    let settings = app_state.settings_snapshot();

    let model = body
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::InvalidRequest("request body has no model".to_string()))?;

    let (provider, parsed) = select_provider(&settings, &model)?;
    let source = provider.source.clone();

    // Upstream sees its own model name, without the provider prefix.
    body["model"] = Value::String(parsed.model_name.clone());

    let outcome = apply_effort_rules(&mut body, &source, &parsed.model_name, &settings.sanitizer);

    let api_key = app_state.keys.select(&provider)?;
    let stream = body.get("stream").and_then(Value::as_bool).unwrap_or(false);

    if stream {
        match OpenAiProvider::chat_completions_stream(
            &provider.base_url,
            &api_key,
            &body,
            &source,
            &settings.sanitizer,
        )
        .await
        {
            Ok(upstream) => {
                let status = upstream.status().as_u16();
                let content_type = upstream
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("text/event-stream")
                    .to_string();
                log_chat_request(
                    &app_state,
                    start_time,
                    &request_id,
                    REQ_TYPE_CHAT_STREAM,
                    &model,
                    &provider.name,
                    source.as_str(),
                    &outcome,
                    status,
                    None,
                )
                .await;

                let upstream_bytes = upstream
                    .bytes_stream()
                    .inspect_err(|e| tracing::warn!("Upstream stream error: {}", e));
                let response = Response::builder()
                    .status(StatusCode::from_u16(status).unwrap_or(StatusCode::OK))
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from_stream(upstream_bytes))
                    .map_err(|e| GatewayError::Config(e.to_string()))?;
                Ok(response)
            }
            Err(e) => {
                log_chat_request(
                    &app_state,
                    start_time,
                    &request_id,
                    REQ_TYPE_CHAT_STREAM,
                    &model,
                    &provider.name,
                    source.as_str(),
                    &outcome,
                    502,
                    Some(e.to_string()),
                )
                .await;
                Err(e)
            }
        }
    } else {
        match OpenAiProvider::chat_completions(
            &provider.base_url,
            &api_key,
            &body,
            &source,
            &settings.sanitizer,
        )
        .await
        {
            Ok(upstream) => {
                log_chat_request(
                    &app_state,
                    start_time,
                    &request_id,
                    REQ_TYPE_CHAT_ONCE,
                    &model,
                    &provider.name,
                    source.as_str(),
                    &outcome,
                    upstream.status,
                    None,
                )
                .await;
                let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
                Ok((status, Json(upstream.body)).into_response())
            }
            Err(e) => {
                log_chat_request(
                    &app_state,
                    start_time,
                    &request_id,
                    REQ_TYPE_CHAT_ONCE,
                    &model,
                    &provider.name,
                    source.as_str(),
                    &outcome,
                    502,
                    Some(e.to_string()),
                )
                .await;
                Err(e)
            }
        }
    }
}
