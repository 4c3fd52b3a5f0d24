mod common;

use actix_web::{App, HttpServer};

use common::{fresh_pool, settings};
use taskboard::config::AccessPolicy;
use taskboard::configure_app;
use taskboard::dashboard::{HttpTaskApi, LoadState, TaskApi, TaskBoard};
use taskboard::models::task::Priority;
use taskboard::routes::tags::tag_models::CreateTagRequest;
use taskboard::routes::tasks::task_models::CreateTaskRequest;

/// Serves the app on an ephemeral local port and returns its base URL.
async fn spawn_server(access_policy: AccessPolicy) -> String {
    let pool = fresh_pool().await;
    let settings = settings(access_policy);

    let server = HttpServer::new(move || App::new().configure(configure_app(pool.clone(), settings)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind test server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    format!("http://{addr}")
}

#[actix_web::test]
async fn dashboard_round_trip_behind_session() {
    let base_url = spawn_server(AccessPolicy::Session).await;
    let api = HttpTaskApi::new(&base_url).unwrap();

    let err = api.list_tasks().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Login required");

    assert!(api.register("ana", "pw").await.unwrap().success);
    assert!(api.login("ana", "pw", false).await.unwrap().success);
    assert_eq!(api.session().await.unwrap().username, "ana");

    let mut board = TaskBoard::new(api);
    board.refresh().await.unwrap();
    assert_eq!(board.state(), LoadState::Ready);

    let tag = board
        .create_tag(CreateTagRequest { name: "home".into(), color: Some("#22c55e".into()) })
        .await
        .unwrap();

    let mut request = CreateTaskRequest::new("Fix the sink");
    request.priority = Priority::High;
    request.tag_ids = vec![tag.id];
    let task = board.create_task(request).await.unwrap();

    assert_eq!(board.tasks().len(), 1);
    assert_eq!(board.tasks()[0].tags, vec![tag]);

    board.toggle_completed(task.id).await.unwrap();
    assert!(board.task(task.id).unwrap().task.completed);

    board.delete_task(task.id).await.unwrap();
    assert!(board.tasks().is_empty());

    let err = board.delete_task(task.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(board.take_notices().last().unwrap().is_error());

    assert!(board.api().logout().await.unwrap().success);
    assert_eq!(board.refresh().await.unwrap_err().status(), Some(401));
    assert_eq!(board.state(), LoadState::Failed);
}

#[actix_web::test]
async fn create_with_unknown_tag_stores_nothing() {
    let base_url = spawn_server(AccessPolicy::Open).await;
    let mut board = TaskBoard::new(HttpTaskApi::new(&base_url).unwrap());
    board.refresh().await.unwrap();

    let mut request = CreateTaskRequest::new("Orphan");
    request.tag_ids = vec![9999];
    let err = board.create_task(request).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to create task");

    assert!(board.tasks().is_empty());
    assert!(board.api().list_tasks().await.unwrap().is_empty());
    assert!(board.take_notices().last().unwrap().is_error());
}

#[actix_web::test]
async fn bad_login_surfaces_message() {
    let base_url = spawn_server(AccessPolicy::Session).await;
    let api = HttpTaskApi::new(base_url).unwrap();

    let err = api.login("ghost", "pw", false).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid username or password");
}
