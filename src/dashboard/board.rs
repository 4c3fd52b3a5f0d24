use std::collections::VecDeque;

use log::{debug, error};

use super::api::{ClientError, TaskApi};
use crate::models::tag::Tag;
use crate::models::task::{Task, TaskWithTags};
use crate::notice::Notice;
use crate::routes::tags::tag_models::CreateTagRequest;
use crate::routes::tasks::task_models::{CreateTaskRequest, UpdateTaskRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Client-side cache of the task list and tag catalogue.
///
/// Mutations go to the API first; only a successful one invalidates the cache
/// and triggers a re-fetch. A failed one leaves the cache as it was and
/// queues a destructive [`Notice`].
pub struct TaskBoard<A> {
    api: A,
    tasks: Vec<TaskWithTags>,
    tags: Vec<Tag>,
    state: LoadState,
    notices: VecDeque<Notice>,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        TaskBoard {
            api,
            tasks: Vec::new(),
            tags: Vec::new(),
            state: LoadState::Idle,
            notices: VecDeque::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn tasks(&self) -> &[TaskWithTags] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn task(&self, id: i64) -> Option<&TaskWithTags> {
        self.tasks.iter().find(|t| t.task.id == id)
    }

    /// Notices queued since the last call, oldest first. A failure notice
    /// carries the server's message, or a generic one when it has none.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.state = LoadState::Loading;

        let fetched = match self.api.list_tasks().await {
            Ok(tasks) => self.api.list_tags().await.map(|tags| (tasks, tags)),
            Err(e) => Err(e),
        };

        match fetched {
            Ok((tasks, tags)) => {
                debug!("Loaded {} tasks and {} tags", tasks.len(), tags.len());
                self.tasks = tasks;
                self.tags = tags;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch tasks: {}", e);
                self.state = LoadState::Failed;
                self.notices.push_back(Notice::error("Failed to fetch tasks"));
                Err(e)
            }
        }
    }

    /// Creates the task with its selected `tag_ids` in one request, so the
    /// task and its tags are stored together or not at all.
    pub async fn create_task(&mut self, request: CreateTaskRequest) -> Result<Task, ClientError> {
        let outcome = self.api.create_task(&request).await;
        self.settle(outcome, "Task created successfully", "Failed to create task")
            .await
    }

    pub async fn update_task(
        &mut self,
        id: i64,
        request: UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        let outcome = self.api.update_task(id, &request).await;
        self.settle(outcome, "Task updated successfully", "Failed to update task")
            .await
    }

    /// Flips the cached completion flag of task `id` on the server. A task
    /// missing from the cache is refused rather than guessed at.
    pub async fn toggle_completed(&mut self, id: i64) -> Result<Task, ClientError> {
        let completed = match self.task(id) {
            Some(entry) => !entry.task.completed,
            None => {
                let e = ClientError::TaskNotLoaded(id);
                error!("Failed to update task: {}", e);
                self.notices.push_back(Notice::error(e.to_string()));
                return Err(e);
            }
        };
        let request = UpdateTaskRequest {
            completed: Some(completed),
            ..Default::default()
        };
        self.update_task(id, request).await
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<Task, ClientError> {
        let outcome = self.api.delete_task(id).await;
        self.settle(outcome, "Task deleted successfully", "Failed to delete task")
            .await
    }

    pub async fn create_tag(&mut self, request: CreateTagRequest) -> Result<Tag, ClientError> {
        let outcome = self.api.create_tag(&request).await;
        self.settle(outcome, "Tag created successfully", "Failed to create tag")
            .await
    }

    async fn settle<T>(
        &mut self,
        outcome: Result<T, ClientError>,
        done: &str,
        failed: &str,
    ) -> Result<T, ClientError> {
        match outcome {
            Ok(value) => {
                self.notices.push_back(Notice::success(done));
                // A failed re-fetch queues its own notice; the mutation itself stands.
                let _ = self.refresh().await;
                Ok(value)
            }
            Err(e) => {
                error!("{}: {}", failed, e);
                let message = e.to_string();
                let description = if message.is_empty() { failed.to_string() } else { message };
                self.notices.push_back(Notice::error(description));
                Err(e)
            }
        }
    }
}
