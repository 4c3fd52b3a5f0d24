use async_trait::async_trait;
use thiserror::Error;

use crate::models::tag::Tag;
use crate::models::task::{Task, TaskWithTags};
use crate::models::task_tag::TaskTag;
use crate::routes::tags::tag_models::CreateTagRequest;
use crate::routes::tasks::task_models::{CreateTaskRequest, UpdateTaskRequest};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// The task is not in the local cache, so its current state is unknown.
    #[error("Task {0} is not loaded")]
    TaskNotLoaded(i64),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::TaskNotLoaded(_) => None,
        }
    }
}

/// The Task API as the dashboard consumes it.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<TaskWithTags>, ClientError>;

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError>;

    async fn update_task(&self, id: i64, request: &UpdateTaskRequest) -> Result<Task, ClientError>;

    async fn delete_task(&self, id: i64) -> Result<Task, ClientError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError>;

    async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag, ClientError>;

    async fn create_task_tag(&self, task_id: i64, tag_id: i64) -> Result<TaskTag, ClientError>;
}
