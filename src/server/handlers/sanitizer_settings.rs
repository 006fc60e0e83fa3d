use axum::{Json, extract::State};
use std::sync::Arc;

use crate::sanitizer::SanitizerConfig;
use crate::server::AppState;

pub async fn get_settings(State(app_state): State<Arc<AppState>>) -> Json<SanitizerConfig> {
    Json(app_state.settings_snapshot().sanitizer)
}

/// Replaces the sanitizer configuration. Last write wins; persistence runs
/// debounced in the background, so this returns before the disk write.
pub async fn update_settings(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SanitizerConfig>,
) -> Json<SanitizerConfig> {
    let snapshot = {
        let mut guard = app_state
            .settings
            .write()
            .unwrap_or_else(|e| e.into_inner());
        guard.sanitizer = payload;
        guard.clone()
    };
    app_state.saver.schedule(snapshot.clone());
    tracing::info!(
        enabled = snapshot.sanitizer.enabled,
        "Sanitizer settings updated"
    );
    Json(snapshot.sanitizer)
}
