use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use log::{error, info};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::auth_models::{
    CheckUsernameRequest, CheckUsernameResponse,
    RegisterRequest, RegisterResponse,
    LoginRequest, LoginResponse,
    SessionResponse, LogoutResponse,
};
use crate::config::AppSettings;
use crate::models::session::Session;
use crate::models::user::User;
use crate::models::validation;
use crate::routes::session_guard::SESSION_COOKIE;

const REMEMBERED_SESSION_DAYS: i64 = 10;
const SESSION_MINUTES: i64 = 30;

fn session_cookie(session_id: String, remember_me: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .finish();
    if remember_me {
        cookie.set_max_age(CookieDuration::days(REMEMBERED_SESSION_DAYS));
    }
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

// Check if username is unique
pub async fn check_username(
    pool: web::Data<SqlitePool>,
    req: web::Json<CheckUsernameRequest>,
) -> impl Responder {
    let username = req.username.trim();
    info!("Received request to check username: {}", username);

    let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool.get_ref())
        .await;

    match result {
        Ok(count) => {
            let is_unique = count == 0;
            info!("Username {} is unique: {}", username, is_unique);
            HttpResponse::Ok().json(CheckUsernameResponse { is_unique })
        }
        Err(e) => {
            error!("Failed to execute query: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// register user to DB
pub async fn register(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AppSettings>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    let RegisterRequest { username, password } = req.into_inner();
    let username = username.trim().to_string();
    info!("Received request to register user: {}", username);

    if let Err(e) = validation::credentials(&username, &password) {
        return HttpResponse::BadRequest().json(RegisterResponse {
            success: false,
            message: e.to_string(),
        });
    }

    let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(&username)
        .fetch_one(pool.get_ref())
        .await;

    match taken {
        Ok(0) => {}
        Ok(_) => {
            info!("Username already taken: {}", username);
            return HttpResponse::BadRequest().json(RegisterResponse {
                success: false,
                message: "Username already taken".into(),
            });
        }
        Err(e) => {
            error!("Failed to execute query: {}", e);
            return HttpResponse::InternalServerError().json(RegisterResponse {
                success: false,
                message: "Failed to register user".into(),
            });
        }
    }

    // Encrypt password with bcrypt off the request thread
    let cost = settings.bcrypt_cost;
    let hashed_password = match web::block(move || hash(password, cost)).await {
        Ok(Ok(hp)) => hp,
        Ok(Err(e)) => {
            error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError().json(RegisterResponse {
                success: false,
                message: "Failed to hash password".into(),
            });
        }
        Err(e) => {
            error!("Password hashing task failed: {}", e);
            return HttpResponse::InternalServerError().json(RegisterResponse {
                success: false,
                message: "Failed to hash password".into(),
            });
        }
    };

    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(&username)
        .bind(hashed_password)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            info!("User {} registered successfully", username);
            HttpResponse::Ok().json(RegisterResponse {
                success: true,
                message: "User registered successfully".into(),
            })
        }
        Err(e) => {
            error!("Failed to execute query: {}", e);
            HttpResponse::InternalServerError().json(RegisterResponse {
                success: false,
                message: "Failed to register user".into(),
            })
        }
    }
}

// login logic
pub async fn login(
    pool: web::Data<SqlitePool>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let LoginRequest { username, password, remember_me } = req.into_inner();
    info!("Received login request for user: {}", username);

    // 1. Get the user data from the database with username
    let user = match sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid username: {}", username);
            return HttpResponse::Unauthorized().json(LoginResponse {
                success: false,
                message: "Invalid username or password".into(),
            });
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", username, e);
            return HttpResponse::InternalServerError().json(LoginResponse {
                success: false,
                message: "Failed to check credentials".into(),
            });
        }
    };

    // 2. Validate hashed password in DB and given password
    let password_hash = user.password_hash.clone();
    let valid = match web::block(move || verify(password, &password_hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            error!("Error when checking password for user {}: {}", username, e);
            false
        }
        Err(e) => {
            error!("Password check task failed for user {}: {}", username, e);
            return HttpResponse::InternalServerError().json(LoginResponse {
                success: false,
                message: "Failed to check credentials".into(),
            });
        }
    };

    if !valid {
        info!("Invalid password for user: {}", username);
        return HttpResponse::Unauthorized().json(LoginResponse {
            success: false,
            message: "Invalid username or password".into(),
        });
    }

    // 3. Generate a new session; each login gets its own row so devices don't evict each other
    let new_session_id = Uuid::new_v4().to_string();
    let expires_at = if remember_me {
        Utc::now() + Duration::days(REMEMBERED_SESSION_DAYS)
    } else {
        Utc::now() + Duration::minutes(SESSION_MINUTES)
    };

    let insert_result = sqlx::query(
        "INSERT INTO sessions (session_id, user_id, expires_at, is_persistent) VALUES (?, ?, ?, ?)",
    )
    .bind(&new_session_id)
    .bind(user.id)
    .bind(expires_at)
    .bind(remember_me)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = insert_result {
        error!("Failed to insert session for user {}: {}", username, e);
        return HttpResponse::InternalServerError().json(LoginResponse {
            success: false,
            message: "Failed to create session".into(),
        });
    }

    // 4. Return session ID inside a cookie to the client
    info!("User {} logged in successfully", username);
    HttpResponse::Ok()
        .cookie(session_cookie(new_session_id, remember_me))
        .json(LoginResponse {
            success: true,
            message: "Login successful".into(),
        })
}

// Resume a session from its cookie
pub async fn current_session(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
) -> impl Responder {
    let session_id = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            info!("Session ID not found in cookies");
            return HttpResponse::Unauthorized().json(SessionResponse {
                success: false,
                message: "Session ID not found in cookies".into(),
                username: "".into(),
            });
        }
    };

    let session = match sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE session_id = ?")
        .bind(&session_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => {
            info!("Invalid session ID: {}", session_id);
            return HttpResponse::Unauthorized().json(SessionResponse {
                success: false,
                message: "Invalid session ID".into(),
                username: "".into(),
            });
        }
        Err(e) => {
            error!("Failed to validate session ID {}: {}", session_id, e);
            return HttpResponse::InternalServerError().json(SessionResponse {
                success: false,
                message: "Failed to validate session".into(),
                username: "".into(),
            });
        }
    };

    if session.is_expired(Utc::now()) {
        // Remove expired session
        if let Err(e) = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(&session_id)
            .execute(pool.get_ref())
            .await
        {
            error!("Failed to remove expired session {}: {}", session_id, e);
        }

        info!("Session expired for session ID: {}", session_id);
        return HttpResponse::Unauthorized()
            .cookie(removal_cookie())
            .json(SessionResponse {
                success: false,
                message: "Login is needed, session expired".into(),
                username: "".into(),
            });
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(session.user_id)
        .fetch_one(pool.get_ref())
        .await;

    match user {
        Ok(user) => {
            info!("Session resumed for user: {}", user.username);
            HttpResponse::Ok().json(SessionResponse {
                success: true,
                message: format!("Welcome back, {}", user.username),
                username: user.username,
            })
        }
        Err(e) => {
            error!("Failed to fetch user information for session ID {}: {}", session_id, e);
            HttpResponse::InternalServerError().json(SessionResponse {
                success: false,
                message: "Failed to fetch user information".into(),
                username: "".into(),
            })
        }
    }
}

pub async fn logout(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
) -> impl Responder {
    // 1. Receive the session ID from the cookie
    let session_id = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            info!("Session ID does not exist in cookies for logout");
            return HttpResponse::BadRequest().json(LogoutResponse {
                success: false,
                message: "Session ID does not exist".into(),
            });
        }
    };

    info!("Received logout request with session ID: {}", session_id);

    // 2. Delete the session whether or not it already expired
    let delete_result = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(&session_id)
        .execute(pool.get_ref())
        .await;

    match delete_result {
        Ok(result) if result.rows_affected() == 0 => {
            info!("Session not found for session ID: {}", session_id);
            HttpResponse::BadRequest()
                .cookie(removal_cookie())
                .json(LogoutResponse {
                    success: false,
                    message: "Session not found".into(),
                })
        }
        Ok(_) => {
            info!("Logout successful for session ID: {}", session_id);
            HttpResponse::Ok()
                .cookie(removal_cookie())
                .json(LogoutResponse {
                    success: true,
                    message: "Logout successful".into(),
                })
        }
        Err(e) => {
            error!("Failed to delete session ID {}: {}", session_id, e);
            HttpResponse::InternalServerError().json(LogoutResponse {
                success: false,
                message: "Failed to logout".into(),
            })
        }
    }
}
