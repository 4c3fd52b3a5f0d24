use actix_web::HttpRequest;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{FromRow, SqlitePool};

use crate::config::AccessPolicy;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone, FromRow)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Name used for the caller in handler logs.
pub fn actor(user: Option<&CurrentUser>) -> &str {
    user.map_or("anonymous", |u| u.username.as_str())
}

// Resolve the caller's session according to the configured access policy.
// Under `Open` nobody is looked up and the result is `None`.
pub async fn authorize(
    pool: &SqlitePool,
    req: &HttpRequest,
    policy: AccessPolicy,
) -> Result<Option<CurrentUser>, ApiError> {
    if policy == AccessPolicy::Open {
        return Ok(None);
    }

    let session_id = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            info!("Rejected {} {}: no session cookie", req.method(), req.path());
            return Err(ApiError::Unauthorized("Login required"));
        }
    };

    let current = sqlx::query_as::<_, CurrentUser>(
        "SELECT s.user_id, u.username, s.expires_at
         FROM sessions s
         JOIN users u ON s.user_id = u.id
         WHERE s.session_id = ?",
    )
    .bind(&session_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::store("Failed to check session", e))?;

    match current {
        Some(user) if user.expires_at > Utc::now() => Ok(Some(user)),
        Some(user) => {
            info!("Session expired for user {}", user.username);
            Err(ApiError::Unauthorized("Session expired"))
        }
        None => {
            info!("Invalid session ID: {}", session_id);
            Err(ApiError::Unauthorized("Invalid session"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_names_the_session_user() {
        let user = CurrentUser {
            user_id: 7,
            username: "ana".into(),
            expires_at: Utc::now(),
        };
        assert_eq!(actor(Some(&user)), "ana");
        assert_eq!(actor(None), "anonymous");
    }
}
