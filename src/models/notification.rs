use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Reminder rows are stored but nothing delivers them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub reminder_time: DateTime<Utc>,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}
