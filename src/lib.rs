//! # seo-relay
//!
//! Backend-for-frontend for a static SEO tools page. Form submissions are
//! turned into tasks for the DataForSEO API, and crawl-style tasks are polled
//! until they finish before their result is narrowed and relayed back.
//!
//! ## Task Flow
//!
//! ```text
//!   POST /api/<feature>
//!          │  validate body (no upstream call on failure)
//!          ▼
//!   ┌──────────────┐   task_post    ┌──────────────────┐
//!   │  Submitter   │ ─────────────▶ │  Task API        │
//!   └──────┬───────┘   task id      │  (DataForSEO)    │
//!          ▼                        │                  │
//!   ┌──────────────┐  status query  │                  │
//!   │   Poller     │ ◀────────────▶ │                  │
//!   └──────┬───────┘ fixed interval └──────────────────┘
//!          ▼         bounded attempts
//!   ┌──────────────┐
//!   │  Extractor   │ ──▶ 200 result | 202 in progress | 500 error
//!   └──────────────┘
//! ```
//!
//! ## Modules
//! - `api`: axum router, handlers and error responses
//! - `task`: task requests, polling state machine, result extraction
//! - `provider`: upstream task API trait and its DataForSEO client
//! - `config`: environment-based configuration

pub mod api;
pub mod config;
pub mod provider;
pub mod task;

pub use config::Config;
