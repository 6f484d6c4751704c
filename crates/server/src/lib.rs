//! Glasspane HTTP surface.
//!
//! Exposes the [`gateway`] operations over axum:
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET /api/public-view/:slug` | read a view without a password |
//! | `POST /api/public-view/:slug` | read a view with `{ password }` |
//! | `GET /api/public-view/:slug/issue-forms` | forms offered by a view |
//! | `GET /api/public-view/:slug/metadata` | states, members, labels (`x-view-password`) |
//! | `POST /api/public-view/:slug/create-issue` | submit a new item |
//! | `GET, POST /api/issue-forms` | owner: list, create |
//! | `GET, PATCH, DELETE /api/issue-forms/:id` | owner: read, update, delete |
//! | `POST /api/issue-forms/:id/questions` | owner: one question-builder step |
//! | `GET /api/views/:slug/form-diagnostics` | owner: stale form references |
//! | `GET /health` | liveness |
//!
//! Owner routes authenticate with `Authorization: Bearer <session token>`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request decoding and the mapping of
//! [`domain::GatewayError`] to status codes and JSON bodies live here.

mod error;
mod handlers;
mod router;
mod serve;
mod state;

#[cfg(test)]
mod tests;

pub use error::{ApiError, ApiResult};
pub use router::create_router;
pub use serve::{run, shutdown_signal, ServerError, ServerSettings};
pub use state::AppState;
