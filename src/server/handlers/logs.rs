use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::logging::RequestLogEntry;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i32>,
}

pub async fn recent_logs(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<RequestLogEntry>>, GatewayError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let logs = app_state
        .log_store
        .recent_logs(limit)
        .await
        .map_err(GatewayError::Db)?;
    Ok(Json(logs))
}
