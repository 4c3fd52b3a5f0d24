use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the task/tag join table. Pairs are not unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskTag {
    pub task_id: i64,
    pub tag_id: i64,
}
