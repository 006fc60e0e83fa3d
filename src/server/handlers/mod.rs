use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::server::AppState;

mod chat;
mod logs;
mod models;
mod sanitizer_settings;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/chat/completions", post(chat::chat_completions))
        .route("/v1/models", get(models::list_models))
        .route(
            "/v1/sanitizer/settings",
            get(sanitizer_settings::get_settings).put(sanitizer_settings::update_settings),
        )
        .route("/v1/sanitizer/logs", get(logs::recent_logs))
}
