use async_trait::async_trait;

use crate::logging::{DatabaseLogger, RequestLogEntry};

// 日志存储抽象（默认 SQLite，可替换）
#[async_trait]
pub trait RequestLogStore: Send + Sync {
    async fn log_request(&self, entry: RequestLogEntry) -> rusqlite::Result<i64>;
    async fn recent_logs(&self, limit: i32) -> rusqlite::Result<Vec<RequestLogEntry>>;
}

#[async_trait]
impl RequestLogStore for DatabaseLogger {
    async fn log_request(&self, entry: RequestLogEntry) -> rusqlite::Result<i64> {
        DatabaseLogger::log_request(self, entry).await
    }

    async fn recent_logs(&self, limit: i32) -> rusqlite::Result<Vec<RequestLogEntry>> {
        DatabaseLogger::recent_logs(self, limit).await
    }
}
