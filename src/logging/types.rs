use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REQ_TYPE_CHAT_ONCE: &str = "chat_once";
pub const REQ_TYPE_CHAT_STREAM: &str = "chat_stream";

/// One forwarded request, including what the sanitizer did to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: Option<i64>,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub request_type: String,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub source: Option<String>,
    pub effort_before: Option<String>,
    pub effort_after: Option<String>,
    pub sanitizer_action: String,
    pub status_code: u16,
    pub response_time_ms: i64,
    pub error_message: Option<String>,
}
