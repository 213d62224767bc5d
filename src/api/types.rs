use serde::Serialize;

use crate::db::RequestLog;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestLogDto {
    pub id: i64,
    pub method: String,
    pub path: String,
    pub status_code: i32,
    pub duration_ms: i64,
    pub user_email: Option<String>,
    pub created_at: String,
}

impl From<RequestLog> for RequestLogDto {
    fn from(log: RequestLog) -> Self {
        Self {
            id: log.id,
            method: log.method,
            path: log.path,
            status_code: log.status_code,
            duration_ms: log.duration_ms,
            user_email: log.user_email,
            created_at: log.created_at,
        }
    }
}
