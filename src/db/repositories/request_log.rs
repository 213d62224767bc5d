use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::entities::{prelude::*, request_logs};

pub struct RequestLogRepository {
    conn: DatabaseConnection,
}

impl RequestLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        method: &str,
        path: &str,
        status_code: u16,
        duration_ms: i64,
        user_email: Option<String>,
    ) -> Result<()> {
        let active_model = request_logs::ActiveModel {
            method: Set(method.to_string()),
            path: Set(path.to_string()),
            status_code: Set(i32::from(status_code)),
            duration_ms: Set(duration_ms),
            user_email: Set(user_email),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        RequestLogs::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<request_logs::Model>> {
        let rows = RequestLogs::find()
            .order_by_desc(request_logs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }
}
