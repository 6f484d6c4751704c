//! API router configuration

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use domain::RequestId;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route(
            "/:slug",
            get(handlers::get_public_view).post(handlers::unlock_public_view),
        )
        .route("/:slug/issue-forms", get(handlers::list_view_forms))
        .route("/:slug/metadata", get(handlers::get_view_metadata))
        .route("/:slug/create-issue", post(handlers::create_issue));

    let owner_routes = Router::new()
        .route(
            "/issue-forms",
            get(handlers::list_forms).post(handlers::create_form),
        )
        .route(
            "/issue-forms/:id",
            get(handlers::get_form)
                .patch(handlers::update_form)
                .delete(handlers::delete_form),
        )
        .route(
            "/issue-forms/:id/questions",
            post(handlers::edit_form_question),
        )
        .route(
            "/views/:slug/form-diagnostics",
            get(handlers::form_diagnostics),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/public-view", public_routes)
        .nest("/api", owner_routes)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %RequestId::new_random(),
                )
            }),
        )
        .with_state(state)
}
