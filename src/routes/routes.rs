use actix_web::web;

use super::auth::auth_handlers;
use super::tags::tag_handlers;
use super::tasks::task_handlers;

pub fn task_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .route("", web::get().to(task_handlers::list_tasks))
            .route("", web::post().to(task_handlers::create_task))
            .route("/{id}", web::put().to(task_handlers::update_task))
            .route("/{id}", web::delete().to(task_handlers::delete_task))
    );
}

pub fn tag_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tags")
            .route("", web::get().to(tag_handlers::list_tags))
            .route("", web::post().to(tag_handlers::create_tag))
    );
    cfg.service(
        web::scope("/api/task-tags")
            .route("", web::post().to(tag_handlers::create_task_tag))
    );
}

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/check-username", web::post().to(auth_handlers::check_username))
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/session", web::post().to(auth_handlers::current_session))
            .route("/logout", web::post().to(auth_handlers::logout))
    );
}
