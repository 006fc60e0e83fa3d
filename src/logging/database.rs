use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::RequestLogEntry;

#[derive(Clone)]
pub struct DatabaseLogger {
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseLogger {
    pub async fn new(database_path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return Err(rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                        Some(format!("Failed to create directory: {}", e)),
                    ));
                }
                tracing::info!("Created database directory: {}", parent.display());
            }
        }

        let conn = Connection::open(database_path)?;
        tracing::info!("Database initialized at: {}", database_path);

        conn.execute(
            "CREATE TABLE IF NOT EXISTS request_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                method TEXT NOT NULL,
                path TEXT NOT NULL,
                request_type TEXT NOT NULL,
                model TEXT,
                provider TEXT,
                source TEXT,
                effort_before TEXT,
                effort_after TEXT,
                sanitizer_action TEXT NOT NULL,
                status_code INTEGER NOT NULL,
                response_time_ms INTEGER NOT NULL,
                error_message TEXT
            )",
            [],
        )?;

        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn log_request(&self, entry: RequestLogEntry) -> Result<i64> {
        let conn = self.connection.lock().await;

        conn.execute(
            "INSERT INTO request_logs (
                request_id, timestamp, method, path, request_type,
                model, provider, source, effort_before, effort_after,
                sanitizer_action, status_code, response_time_ms, error_message
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            (
                &entry.request_id,
                entry.timestamp.to_rfc3339(),
                &entry.method,
                &entry.path,
                &entry.request_type,
                &entry.model,
                &entry.provider,
                &entry.source,
                &entry.effort_before,
                &entry.effort_after,
                &entry.sanitizer_action,
                entry.status_code,
                entry.response_time_ms,
                &entry.error_message,
            ),
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub async fn recent_logs(&self, limit: i32) -> Result<Vec<RequestLogEntry>> {
        let conn = self.connection.lock().await;

        let mut stmt = conn.prepare(
            "SELECT id, request_id, timestamp, method, path, request_type,
                    model, provider, source, effort_before, effort_after,
                    sanitizer_action, status_code, response_time_ms, error_message
             FROM request_logs
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit], |row| {
            let raw_timestamp: String = row.get(2)?;
            let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

            Ok(RequestLogEntry {
                id: Some(row.get(0)?),
                request_id: row.get(1)?,
                timestamp,
                method: row.get(3)?,
                path: row.get(4)?,
                request_type: row.get(5)?,
                model: row.get(6)?,
                provider: row.get(7)?,
                source: row.get(8)?,
                effort_before: row.get(9)?,
                effort_after: row.get(10)?,
                sanitizer_action: row.get(11)?,
                status_code: row.get(12)?,
                response_time_ms: row.get(13)?,
                error_message: row.get(14)?,
            })
        })?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }
}
