//! Personal task board: a JSON task/tag API over SQLite, server-side session
//! accounts, and the client-side identity gate and dashboard cache that sit in
//! front of it.

use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod gate;
pub mod models;
pub mod notice;
pub mod routes;

use config::AppSettings;
use error::ApiError;

/// Registers shared state and every API route on an `App`.
pub fn configure_app(
    pool: SqlitePool,
    settings: AppSettings,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::BadPayload {
                message: "Invalid request body",
                detail: err.to_string(),
            }
            .into()
        });

        cfg.app_data(web::Data::new(pool))
            .app_data(web::Data::new(settings))
            .app_data(json_config)
            .route("/api/health", web::get().to(|| async { HttpResponse::Ok().body("ok") }))
            .configure(routes::routes::auth_configure)
            .configure(routes::routes::task_configure)
            .configure(routes::routes::tag_configure);
    }
}
