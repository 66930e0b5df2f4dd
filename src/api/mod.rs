//! HTTP API consumed by the static web page.
//!
//! One POST endpoint per feature, each accepting a small JSON body and
//! answering with the extracted result, an in-progress marker carrying the
//! task id, or `{"error": "..."}`.

mod error;
mod handlers;
mod routes;
mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
