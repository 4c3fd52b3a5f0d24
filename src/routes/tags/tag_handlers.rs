use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use sqlx::SqlitePool;

use super::tag_models::{CreateTagRequest, CreateTaskTagRequest};
use crate::config::AppSettings;
use crate::error::ApiError;
use crate::models::tag::Tag;
use crate::models::task_tag::TaskTag;
use crate::routes::session_guard::{actor, authorize};

// Handler to get the tag list
pub async fn list_tags(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;

    let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| ApiError::store("Failed to fetch tags", e))?;

    debug!("Listed {} tags for {}", tags.len(), actor(user.as_ref()));
    Ok(HttpResponse::Ok().json(tags))
}

// Handler to add a tag
pub async fn create_tag(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
    payload: web::Json<CreateTagRequest>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Failed to create tag";

    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;
    payload.validate().map_err(|e| ApiError::invalid(FAILED, e))?;

    // A duplicate name trips the UNIQUE constraint and surfaces as a store error.
    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (name, color, created_at) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(payload.name.trim())
    .bind(payload.color_or_default())
    .bind(Utc::now())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::store(FAILED, e))?;

    info!("Created tag {} ({}) for {}", tag.id, tag.name, actor(user.as_ref()));
    Ok(HttpResponse::Created().json(tag))
}

// Handler to attach one tag to one task. Repeated pairs are stored again.
pub async fn create_task_tag(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
    payload: web::Json<CreateTaskTagRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;

    let association = sqlx::query_as::<_, TaskTag>(
        "INSERT INTO task_tags (task_id, tag_id) VALUES (?, ?) RETURNING task_id, tag_id",
    )
    .bind(payload.task_id)
    .bind(payload.tag_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::store("Failed to associate tag with task", e))?;

    info!(
        "Tagged task {} with tag {} for {}",
        association.task_id,
        association.tag_id,
        actor(user.as_ref())
    );
    Ok(HttpResponse::Created().json(association))
}
