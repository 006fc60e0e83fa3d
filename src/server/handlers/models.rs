use axum::{Json, extract::State};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::providers::openai::{Model, ModelListResponse, fetch_provider_models};
use crate::server::AppState;

/// Aggregates model listings across every configured provider. A provider
/// that fails to answer is skipped, not fatal.
pub async fn list_models(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ModelListResponse>, GatewayError> {
    let settings = app_state.settings_snapshot();

    let mut data: Vec<Model> = Vec::new();
    for provider in settings.providers.values() {
        let api_key = match app_state.keys.select(provider) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Skipping provider '{}': {}", provider.name, e);
                continue;
            }
        };
        match fetch_provider_models(provider, &api_key).await {
            Ok(models) => data.extend(models),
            Err(e) => {
                tracing::warn!("Model listing failed for provider '{}': {}", provider.name, e)
            }
        }
    }

    Ok(Json(ModelListResponse {
        object: "list".to_string(),
        data,
    }))
}
