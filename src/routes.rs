// src/routes.rs

pub mod routes;
pub mod session_guard;

pub mod auth {
    pub mod auth_handlers;
    pub mod auth_models;
}

pub mod tags {
    pub mod tag_handlers;
    pub mod tag_models;
}

pub mod tasks {
    pub mod task_handlers;
    pub mod task_models;
}
