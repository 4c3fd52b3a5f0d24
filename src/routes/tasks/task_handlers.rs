use std::collections::{HashMap, HashSet};

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

use super::task_models::{CreateTaskRequest, UpdateTaskRequest};
use crate::config::AppSettings;
use crate::error::ApiError;
use crate::models::notification::Notification;
use crate::models::tag::Tag;
use crate::models::task::{Task, TaskWithTags};
use crate::routes::session_guard::{actor, authorize};

// One tag joined to the task it is attached to.
#[derive(FromRow)]
struct TaggedRow {
    task_id: i64,
    tag_id: i64,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
}

// Handler to list every task with its tags resolved
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;

    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| ApiError::store("Failed to fetch tasks", e))?;

    let tagged = sqlx::query_as::<_, TaggedRow>(
        "
        SELECT tt.task_id, t.id AS tag_id, t.name, t.color, t.created_at
        FROM task_tags tt
        JOIN tags t ON t.id = tt.tag_id
        ORDER BY tt.rowid
        ",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| ApiError::store("Failed to fetch tasks", e))?;

    let mut tags_by_task: HashMap<i64, Vec<Tag>> = HashMap::new();
    for row in tagged {
        tags_by_task.entry(row.task_id).or_default().push(Tag {
            id: row.tag_id,
            name: row.name,
            color: row.color,
            created_at: row.created_at,
        });
    }

    let tasks: Vec<TaskWithTags> = tasks
        .into_iter()
        .map(|task| {
            let tags = tags_by_task.remove(&task.id).unwrap_or_default();
            TaskWithTags { task, tags }
        })
        .collect();

    debug!("Listed {} tasks for {}", tasks.len(), actor(user.as_ref()));
    Ok(HttpResponse::Ok().json(tasks))
}

// Handler to create a task, optionally tagged in the same transaction
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Failed to create task";

    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;
    let payload = payload.into_inner();
    payload.validate().map_err(|e| ApiError::invalid(FAILED, e))?;

    let now = Utc::now();
    let mut tx = pool.begin().await.map_err(|e| ApiError::store(FAILED, e))?;

    let task = sqlx::query_as::<_, Task>(
        "
        INSERT INTO tasks (title, description, category, due_date, priority, completed, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(payload.category)
    .bind(payload.due_date)
    .bind(payload.priority)
    .bind(payload.completed)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| ApiError::store(FAILED, e))?;

    if !payload.tag_ids.is_empty() {
        replace_tag_set(&mut tx, task.id, &payload.tag_ids)
            .await
            .map_err(|e| ApiError::store(FAILED, e))?;
    }

    tx.commit().await.map_err(|e| ApiError::store(FAILED, e))?;

    info!("Created task {} ({}) for {}", task.id, task.title, actor(user.as_ref()));
    Ok(HttpResponse::Created().json(task))
}

// Handler to update a task. The field update and any tag replacement commit together.
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Failed to update task";

    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;
    let task_id = path.into_inner();
    let payload = payload.into_inner();
    payload.validate().map_err(|e| ApiError::invalid(FAILED, e))?;

    let mut tx = pool.begin().await.map_err(|e| ApiError::store(FAILED, e))?;

    // The UPDATE comes first so the transaction holds the write lock before
    // touching task_tags.
    let updated = sqlx::query_as::<_, Task>(
        "
        UPDATE tasks SET
            title = COALESCE(?, title),
            description = CASE WHEN ? THEN ? ELSE description END,
            category = COALESCE(?, category),
            priority = COALESCE(?, priority),
            due_date = CASE WHEN ? THEN ? ELSE due_date END,
            completed = COALESCE(?, completed),
            updated_at = ?
        WHERE id = ?
        RETURNING *
        ",
    )
    .bind(payload.title.as_deref().map(str::trim))
    .bind(payload.description.is_some())
    .bind(payload.description.clone().flatten())
    .bind(payload.category)
    .bind(payload.priority)
    .bind(payload.due_date.is_some())
    .bind(payload.due_date.flatten())
    .bind(payload.completed)
    .bind(Utc::now())
    .bind(task_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| ApiError::store(FAILED, e))?;

    let task = match updated {
        Some(task) => task,
        None => {
            info!("Task not found for update: {}", task_id);
            return Err(ApiError::NotFound("Task not found"));
        }
    };

    if let Some(tag_ids) = &payload.tag_ids {
        replace_tag_set(&mut tx, task_id, tag_ids)
            .await
            .map_err(|e| ApiError::store(FAILED, e))?;
    }

    tx.commit().await.map_err(|e| ApiError::store(FAILED, e))?;

    info!("Updated task {} for {}", task_id, actor(user.as_ref()));
    Ok(HttpResponse::Ok().json(task))
}

// Handler to delete a task together with its join rows and reminders
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    const FAILED: &str = "Failed to delete task";

    let user = authorize(pool.get_ref(), &req, settings.access_policy).await?;
    let task_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| ApiError::store(FAILED, e))?;

    let reminders =
        sqlx::query_as::<_, Notification>("DELETE FROM notifications WHERE task_id = ? RETURNING *")
            .bind(task_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| ApiError::store(FAILED, e))?;

    let unlinked = sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
        .bind(task_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::store(FAILED, e))?
        .rows_affected();

    let deleted = sqlx::query_as::<_, Task>("DELETE FROM tasks WHERE id = ? RETURNING *")
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| ApiError::store(FAILED, e))?;

    let task = match deleted {
        Some(task) => task,
        None => {
            // dropping `tx` rolls back
            info!("Task not found for delete: {}", task_id);
            return Err(ApiError::NotFound("Task not found"));
        }
    };

    tx.commit().await.map_err(|e| ApiError::store(FAILED, e))?;

    info!(
        "Deleted task {} for {} with {} tag links and {} reminders ({} unsent)",
        task_id,
        actor(user.as_ref()),
        unlinked,
        reminders.len(),
        reminders.iter().filter(|r| !r.sent).count()
    );
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces the tag set of `task_id` with `tag_ids` inside `tx`.
/// Repeated ids in the request are stored once.
async fn replace_tag_set(
    tx: &mut Transaction<'_, Sqlite>,
    task_id: i64,
    tag_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    let mut seen = HashSet::new();
    for tag_id in tag_ids.iter().copied().filter(|id| seen.insert(*id)) {
        sqlx::query("INSERT INTO task_tags (task_id, tag_id) VALUES (?, ?)")
            .bind(task_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
