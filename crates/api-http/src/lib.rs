//! HTTP JSON API
//!
//! Exposes the submission and query services over the REST surface
//! (`POST /task`, `GET /task`, `POST /queue`) plus a health probe.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use handlers::build_router;
pub use server::{HttpServer, HttpServerConfig};
pub use state::AppState;
