use async_trait::async_trait;
use log::warn;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::api::{ClientError, TaskApi};
use crate::error::ErrorBody;
use crate::models::tag::Tag;
use crate::models::task::{Task, TaskWithTags};
use crate::models::task_tag::TaskTag;
use crate::routes::auth::auth_models::{
    LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse,
    SessionResponse,
};
use crate::routes::tags::tag_models::{CreateTagRequest, CreateTaskTagRequest};
use crate::routes::tasks::task_models::{CreateTaskRequest, UpdateTaskRequest};

/// [`TaskApi`] over HTTP. The cookie store carries the session cookie set by
/// [`HttpTaskApi::login`] into every later request.
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(HttpTaskApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let raw = response.text().await.unwrap_or_default();
        let (message, detail) = match serde_json::from_str::<ErrorBody>(&raw) {
            Ok(body) => (body.message, body.error),
            Err(_) => (
                status.canonical_reason().unwrap_or("Request failed").to_string(),
                (!raw.is_empty()).then_some(raw),
            ),
        };
        warn!("API request failed with {}: {}", status, message);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            detail,
        })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterResponse, ClientError> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(self.client.post(self.url("/api/auth/register")).json(&body))
            .await
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me,
        };
        self.send(self.client.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    pub async fn session(&self) -> Result<SessionResponse, ClientError> {
        self.send(self.client.post(self.url("/api/auth/session")))
            .await
    }

    pub async fn logout(&self) -> Result<LogoutResponse, ClientError> {
        self.send(self.client.post(self.url("/api/auth/logout")))
            .await
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<TaskWithTags>, ClientError> {
        self.send(self.client.get(self.url("/api/tasks"))).await
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.send(self.client.post(self.url("/api/tasks")).json(request))
            .await
    }

    async fn update_task(&self, id: i64, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        self.send(self.client.put(self.url(&format!("/api/tasks/{id}"))).json(request))
            .await
    }

    async fn delete_task(&self, id: i64) -> Result<Task, ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/tasks/{id}"))))
            .await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.send(self.client.get(self.url("/api/tags"))).await
    }

    async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag, ClientError> {
        self.send(self.client.post(self.url("/api/tags")).json(request))
            .await
    }

    async fn create_task_tag(&self, task_id: i64, tag_id: i64) -> Result<TaskTag, ClientError> {
        let body = CreateTaskTagRequest { task_id, tag_id };
        self.send(self.client.post(self.url("/api/task-tags")).json(&body))
            .await
    }
}
