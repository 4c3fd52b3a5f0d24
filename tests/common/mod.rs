#![allow(dead_code, unused_macros)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;
use sqlx::SqlitePool;

use taskboard::config::{AccessPolicy, AppSettings};
use taskboard::db;

/// Builds the full application around `$pool` as an in-process test service.
macro_rules! test_app {
    ($pool:expr, $policy:expr) => {
        actix_web::test::init_service(actix_web::App::new().configure(taskboard::configure_app(
            $pool,
            crate::common::settings($policy),
        )))
        .await
    };
}

/// `POST`s `$body` to `$uri` and returns the response.
macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {
        actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request(),
        )
        .await
    };
}

/// Creates a tag named `$name` and yields its id.
macro_rules! create_tag {
    ($app:expr, $name:expr) => {{
        let resp = post_json!($app, "/api/tags", serde_json::json!({ "name": $name }));
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        crate::common::json_of(resp).await["id"]
            .as_i64()
            .expect("tag id")
    }};
}

/// Creates a task from `$body` and yields the created task as JSON.
macro_rules! create_task {
    ($app:expr, $body:expr) => {{
        let resp = post_json!($app, "/api/tasks", $body);
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        crate::common::json_of(resp).await
    }};
}

pub fn settings(access_policy: AccessPolicy) -> AppSettings {
    AppSettings {
        access_policy,
        bcrypt_cost: 4,
    }
}

pub async fn fresh_pool() -> SqlitePool {
    db::connect_in_memory().await.expect("in-memory database")
}

pub async fn json_of<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("JSON response body")
}

pub fn tag_ids(task: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = task["tags"]
        .as_array()
        .expect("tags array")
        .iter()
        .map(|t| t["id"].as_i64().expect("tag id"))
        .collect();
    ids.sort_unstable();
    ids
}
