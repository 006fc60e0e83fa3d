pub mod handlers;
pub(crate) mod effort_resolve;
pub(crate) mod provider_dispatch;
pub(crate) mod request_logging;
pub mod storage_traits;

use std::sync::{Arc, RwLock};

use axum::Router;
use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Settings, SettingsSaver};
use crate::error::Result as AppResult;
use crate::logging::DatabaseLogger;
use crate::routing::KeyRotation;
use crate::server::storage_traits::RequestLogStore;

pub struct AppState {
    pub settings: RwLock<Settings>,
    pub log_store: Arc<dyn RequestLogStore + Send + Sync>,
    pub keys: KeyRotation,
    pub saver: SettingsSaver,
}

impl AppState {
    /// Settings snapshot for one request. The guard is never held across an
    /// await point; config updates between two reads are last-write-wins.
    pub fn settings_snapshot(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

pub async fn create_app(settings: Settings) -> AppResult<Router> {
    let log_store = Arc::new(DatabaseLogger::new(&settings.logging.database_path).await?);
    let saver = SettingsSaver::spawn(Settings::config_path());
    let keys = KeyRotation::new(settings.routing.key_strategy.clone());

    let app_state = AppState {
        settings: RwLock::new(settings),
        log_store,
        keys,
        saver,
    };

    let mut app = handlers::routes().with_state(Arc::new(app_state));

    // CORS（开发环境便于前端联调；生产应收敛来源并仅 HTTPS）
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true);
    app = app.layer(cors).layer(TraceLayer::new_for_http());

    Ok(app)
}
