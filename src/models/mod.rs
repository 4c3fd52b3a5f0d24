// src/models/mod.rs

pub mod user;
pub mod session;
pub mod tag;
pub mod task;
pub mod task_tag;
pub mod notification;
pub mod validation;
