use chrono::{DateTime, Utc};

use crate::logging::RequestLogEntry;
use crate::sanitizer::EffortOutcome;
use crate::server::AppState;

// 记录聊天请求日志（包含清理器对请求体做的处理）
pub async fn log_chat_request(
    app_state: &AppState,
    start_time: DateTime<Utc>,
    request_id: &str,
    request_type: &str,
    model: &str,
    provider_name: &str,
    source: &str,
    outcome: &EffortOutcome,
    status_code: u16,
    error_message: Option<String>,
) {
    let end_time = Utc::now();
    let response_time_ms = (end_time - start_time).num_milliseconds();

    let entry = RequestLogEntry {
        id: None,
        request_id: request_id.to_string(),
        timestamp: start_time,
        method: "POST".to_string(),
        path: "/v1/chat/completions".to_string(),
        request_type: request_type.to_string(),
        model: Some(model.to_string()),
        provider: Some(provider_name.to_string()),
        source: Some(source.to_string()),
        effort_before: outcome.before.as_ref().map(|v| v.to_string()),
        effort_after: outcome.after.as_ref().map(|v| v.to_string()),
        sanitizer_action: outcome.disposition().to_string(),
        status_code,
        response_time_ms,
        error_message,
    };

    if let Err(e) = app_state.log_store.log_request(entry).await {
        tracing::error!("Failed to log request: {}", e);
    }
}
