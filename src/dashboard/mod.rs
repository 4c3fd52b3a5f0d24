//! Dashboard client: the Task API seen from the browser side, and the task
//! cache the dashboard renders from.

pub mod api;
pub mod board;
pub mod http;

pub use api::{ClientError, TaskApi};
pub use board::{LoadState, TaskBoard};
pub use http::HttpTaskApi;
